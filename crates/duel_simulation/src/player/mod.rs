//! Player combat controller
//!
//! Движение относительно камеры, 4 слота атаки, уклонение, отложенная реакция на удар.
//!
//! Порядок выполнения (FixedUpdate):
//! 1. validate_player_setup (SimulationSet::Sense)
//! 2. resolve_player_sequences: после advance_sequences (SimulationSet::Sequences)
//! 3. process_player_commands → player_locomotion → advance_dodge (Decide)
//! 4. player_take_damage, start_player_hit_reactions (Resolve)

use bevy::prelude::*;

pub mod controller;
pub mod systems;


pub use controller::*;
pub use systems::{
    attack_ready, camera_relative_direction, dodge_ready, targets_in_radius,
};

use crate::combat::sequence::advance_sequences;
use crate::SimulationSet;

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerCommand>();

        app.add_systems(
            FixedUpdate,
            systems::validate_player_setup.in_set(SimulationSet::Sense),
        )
        .add_systems(
            FixedUpdate,
            systems::resolve_player_sequences
                .in_set(SimulationSet::Sequences)
                .after(advance_sequences),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::process_player_commands,
                systems::player_locomotion,
                systems::advance_dodge,
            )
                .chain()
                .in_set(SimulationSet::Decide),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::player_take_damage,
                systems::start_player_hit_reactions,
            )
                .chain()
                .in_set(SimulationSet::Resolve),
        );
    }
}
