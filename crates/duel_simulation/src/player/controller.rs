//! Player combat controller: компоненты, tuning, input команды, setup валидация

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{player_roster, AttackMove, HitFeedback, ATTACK_SLOTS};
use crate::components::{Combatant, Health, MovementInput, Side};

/// Dodge clip
pub const DODGE_ANIMATION: &str = "DodgeFrontAnimation";
/// Hit reaction clip игрока
pub const PLAYER_HIT_ANIMATION: &str = "HitDamageAnimation";

/// Runtime состояние контроллера игрока
///
/// Атака не эксклюзивна (только cooldown), уклонение: эксклюзивно (CombatState::Dodging).
#[derive(Component, Debug, Clone, Default)]
#[require(MovementInput)]
pub struct PlayerController {
    /// Время последней атаки (fixed elapsed, секунды)
    pub last_attack_at: Option<f32>,
    /// Время последнего уклонения
    pub last_dodge_at: Option<f32>,
    /// Активное уклонение (интерполяция позиции)
    pub dodge: Option<DodgeMotion>,
}

/// Интерполяция позиции во время уклонения: start → target за duration
///
/// Длительность на `Timer` (как шаги `Sequences`): lock держится ровно dodge_duration.
#[derive(Debug, Clone, PartialEq)]
pub struct DodgeMotion {
    pub start: Vec3,
    pub target: Vec3,
    timer: Timer,
}

impl DodgeMotion {
    pub fn new(start: Vec3, forward: Vec3, distance: f32, duration: f32) -> Self {
        Self {
            start,
            target: start + forward * distance,
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
        }
    }

    /// Продвинуть на delta, вернуть желаемую позицию
    pub fn advance(&mut self, delta: Duration) -> Vec3 {
        self.timer.tick(delta);
        self.start.lerp(self.target, self.timer.fraction())
    }

    pub fn is_finished(&self) -> bool {
        self.timer.finished()
    }
}

/// Опциональные дефекты обработки урона (выключены по умолчанию)
///
/// - `double_apply`: TakeDamage снимает health сразу И ещё раз в отложенной реакции
/// - `unguarded_reactions`: повторные запросы реакции не отбрасываются, таймеры стекаются
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageQuirks {
    pub double_apply: bool,
    pub unguarded_reactions: bool,
}

/// Параметры игрока (задаются один раз при spawn)
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Скорость ходьбы (m/s)
    pub move_speed: f32,
    /// Скорость поворота (slerp factor / sec)
    pub rotation_speed: f32,
    /// Гравитация (m/s², положительная = вниз)
    pub gravity: f32,
    /// Минимальный интервал между атаками (секунды)
    pub attack_cooldown: f32,
    /// Радиус поражения оппонентов (метры)
    pub attack_radius: f32,
    pub attack_moves: Vec<AttackMove>,
    pub dodge_distance: f32,
    pub dodge_cooldown: f32,
    pub dodge_duration: f32,
    /// Задержка отложенной реакции на удар (секунды)
    pub reaction_delay: f32,
    pub max_health: u32,
    pub quirks: DamageQuirks,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 10.0,
            gravity: 9.81,
            attack_cooldown: 0.5,
            attack_radius: 2.2,
            attack_moves: player_roster(5, 2.2),
            dodge_distance: 2.0,
            dodge_cooldown: 1.0,
            dodge_duration: 0.5,
            reaction_delay: 0.5,
            max_health: 100,
            quirks: DamageQuirks::default(),
        }
    }
}

impl PlayerTuning {
    /// Одинаковый урон на всех слотах атаки
    pub fn with_attack_damage(mut self, damage: u32) -> Self {
        for attack in &mut self.attack_moves {
            attack.damage = damage;
        }
        self
    }

    pub fn with_quirks(mut self, quirks: DamageQuirks) -> Self {
        self.quirks = quirks;
        self
    }
}

/// Команды с UI кнопок (attack 1-4, dodge)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Attack { slot: usize },
    Dodge,
}

/// Marker: контроллер выключен из-за ошибки setup (без retry)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ControllerDisabled;

/// Ошибки setup контроллера игрока
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("no main camera in scene, camera-relative movement is impossible")]
    MissingCamera,
    #[error("expected {expected} attack moves, found {found}")]
    AttackSlots { expected: usize, found: usize },
}

/// Проверка зависимостей контроллера
pub fn check_player_setup(camera_present: bool, tuning: &PlayerTuning) -> Result<(), SetupError> {
    if !camera_present {
        return Err(SetupError::MissingCamera);
    }

    if tuning.attack_moves.len() != ATTACK_SLOTS {
        return Err(SetupError::AttackSlots {
            expected: ATTACK_SLOTS,
            found: tuning.attack_moves.len(),
        });
    }

    Ok(())
}

/// Полный набор компонентов игрока
pub fn player_bundle(position: Vec3, tuning: PlayerTuning) -> impl Bundle {
    (
        Combatant { side: Side::Player },
        Health::new(tuning.max_health),
        PlayerController::default(),
        HitFeedback::default(),
        Transform::from_translation(position),
        tuning,
    )
}
