//! Opponent AI components (brain, tuning, spawn bundle)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{opponent_roster, AttackMove, HitFeedback, SequenceId};
use crate::components::{Combatant, Health, Side};


/// Hit reaction clip оппонента
pub const OPPONENT_HIT_ANIMATION: &str = "HitDamageAnimation";
/// Death clip
pub const DEATH_ANIMATION: &str = "Die";
/// Animator triggers
pub const HIT_TRIGGER: &str = "Hit";
pub const DEATH_TRIGGER: &str = "Death";

/// Runtime состояние оппонента
#[derive(Component, Debug, Clone, Default)]
pub struct OpponentBrain {
    /// Текущая цель (игрок). None → ищем в acquire_opponent_target
    pub target: Option<Entity>,
    /// Время последней атаки (fixed elapsed, секунды)
    pub last_attack_at: Option<f32>,
    /// Таймер сброса текущей атаки (отменяется при получении урона)
    pub attack_reset: Option<SequenceId>,
    /// Ошибка "нет цели" уже залогирована (не спамим каждый тик)
    pub target_missing_reported: bool,
}

impl OpponentBrain {
    pub fn targeting(target: Entity) -> Self {
        Self {
            target: Some(target),
            ..default()
        }
    }

    /// Cooldown атаки: строго больше cooldown с прошлой атаки
    pub fn attack_ready(&self, now: f32, cooldown: f32) -> bool {
        self.last_attack_at.map_or(true, |last| now - last > cooldown)
    }
}

/// Параметры оппонента
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct OpponentTuning {
    /// Скорость движения к игроку (m/s)
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub gravity: f32,
    /// Vertical velocity на земле (прижимает к полу)
    pub grounded_velocity: f32,
    pub attack_cooldown: f32,
    /// Дистанция, с которой оппонент начинает атаковать
    pub attack_radius: f32,
    pub attack_moves: Vec<AttackMove>,
    /// Через сколько Attacking → Idle (таймер, не конец анимации)
    pub attack_reset_delay: f32,
    /// Задержка перед hit анимацией
    pub hit_initial_delay: f32,
    /// Длительность hit reaction
    pub hit_duration: f32,
    pub despawn_delay: f32,
    pub max_health: u32,
}

impl Default for OpponentTuning {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            rotation_speed: 10.0,
            gravity: 9.81,
            grounded_velocity: -0.5,
            attack_cooldown: 1.5,
            attack_radius: 2.2,
            attack_moves: opponent_roster(),
            attack_reset_delay: 1.0,
            hit_initial_delay: 0.3,
            hit_duration: 0.5,
            despawn_delay: 3.0,
            max_health: 100,
        }
    }
}

impl OpponentTuning {
    /// Guard TakingDamage дольше этого: считаем застрявшим
    pub fn stuck_guard_threshold(&self) -> f32 {
        self.hit_duration * 2.0
    }
}

/// Полный набор компонентов оппонента
pub fn opponent_bundle(position: Vec3, tuning: OpponentTuning) -> impl Bundle {
    (
        Combatant {
            side: Side::Opponent,
        },
        Health::new(tuning.max_health),
        OpponentBrain::default(),
        HitFeedback::default(),
        Transform::from_translation(position),
        tuning,
    )
}
