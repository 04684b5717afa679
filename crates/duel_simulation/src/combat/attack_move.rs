//! Attack moves: набор ударов архетипа (clip + damage + range + effect)

use serde::{Deserialize, Serialize};

/// Количество слотов атаки у каждого архетипа (4 кнопки UI)
pub const ATTACK_SLOTS: usize = 4;

/// Handle визуального эффекта (particle system на стороне движка)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle(pub String);

impl EffectHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Один удар
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackMove {
    /// Имя animation clip
    pub animation: String,
    /// Урон
    pub damage: u32,
    /// Эффективная дистанция (метры)
    pub range: f32,
    /// Опциональный визуальный эффект
    pub effect: Option<EffectHandle>,
}

impl AttackMove {
    pub fn new(animation: impl Into<String>, damage: u32, range: f32) -> Self {
        Self {
            animation: animation.into(),
            damage,
            range,
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: EffectHandle) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Стандартные clip names: Attack1Animation..Attack4Animation
pub fn attack_clip(slot: usize) -> String {
    format!("Attack{}Animation", slot + 1)
}

/// Roster игрока: одинаковый урон на всех слотах + special effect на каждом
pub fn player_roster(damage: u32, range: f32) -> Vec<AttackMove> {
    (0..ATTACK_SLOTS)
        .map(|slot| {
            AttackMove::new(attack_clip(slot), damage, range)
                .with_effect(EffectHandle::new(format!("Attack{}SpecialEffect", slot + 1)))
        })
        .collect()
}

/// Roster оппонента: 10 / 15 / 20 / 25 урона, range 2.5
pub fn opponent_roster() -> Vec<AttackMove> {
    (0..ATTACK_SLOTS)
        .map(|slot| AttackMove::new(attack_clip(slot), 10 + slot as u32 * 5, 2.5))
        .collect()
}
