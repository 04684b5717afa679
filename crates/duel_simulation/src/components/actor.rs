//! Базовые компоненты бойцов: Combatant, Health, CombatState

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Sequences;
use crate::components::{CharacterMotor, Locomotion};

/// Боец (игрок или оппонент): базовый компонент для участников дуэли
///
/// Автоматически добавляет Health, CombatState, Sequences и motor через Required Components.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Health, CombatState, Sequences, CharacterMotor, Locomotion, Transform)]
pub struct Combatant {
    pub side: Side,
}

/// Сторона конфликта (для result manager и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max. Health только убывает после spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Saturating: health не уходит ниже нуля
    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Состояние бойца (единственный источник правды вместо набора bool флагов)
///
/// Пишут только системы архетипа-владельца:
/// - оппонент: Idle / Attacking / TakingDamage / Dead
/// - игрок: Idle / Dodging / Dead (реакция на урон: в Sequences)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum CombatState {
    #[default]
    Idle,

    /// Атака в процессе (сбрасывается таймером AttackReset)
    Attacking,

    /// Уклонение в процессе (движение заблокировано)
    Dodging,

    /// Hit reaction в процессе
    TakingDamage {
        /// Время входа в состояние (fixed elapsed, секунды)
        since: f32,
    },

    /// Терминальное состояние
    Dead,
}

impl CombatState {
    pub fn is_dead(&self) -> bool {
        matches!(self, CombatState::Dead)
    }

    pub fn is_taking_damage(&self) -> bool {
        matches!(self, CombatState::TakingDamage { .. })
    }

    /// Сколько секунд удерживается guard TakingDamage (None если не в нём)
    pub fn damage_guard_age(&self, now: f32) -> Option<f32> {
        match self {
            CombatState::TakingDamage { since } => Some(now - since),
            _ => None,
        }
    }
}
