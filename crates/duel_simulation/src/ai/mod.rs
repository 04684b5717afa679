//! Opponent AI module
//!
//! Простое поведение ближнего боя. Вне радиуса оппонент идёт к игроку, в радиусе
//! атакует по cooldown. Урон запускает hit reaction, смерть - удаление через despawn_delay.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use systems::reset_damage_state;

use crate::combat::sequence::advance_sequences;
use crate::player::systems as player_systems;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. validate_opponent_roster → acquire_opponent_target (Sense)
/// 2. resolve_opponent_sequences: после advance_sequences (Sequences)
/// 3. opponent_behaviour: движение + атака (Decide)
/// 4. opponent_take_damage (Resolve)
///
/// Внутри каждого set'а оппонент идёт после игрока: общий RNG и порядок событий
/// должны совпадать между прогонами.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                systems::validate_opponent_roster,
                systems::acquire_opponent_target,
            )
                .chain()
                .in_set(SimulationSet::Sense),
        )
        .add_systems(
            FixedUpdate,
            systems::resolve_opponent_sequences
                .in_set(SimulationSet::Sequences)
                .after(advance_sequences)
                .after(player_systems::resolve_player_sequences),
        )
        .add_systems(
            FixedUpdate,
            systems::opponent_behaviour
                .in_set(SimulationSet::Decide)
                .after(player_systems::advance_dodge),
        )
        .add_systems(
            FixedUpdate,
            systems::opponent_take_damage
                .in_set(SimulationSet::Resolve)
                .after(player_systems::start_player_hit_reactions),
        );
    }
}
