//! Physics module (headless)
//!
//! Ground check + применение движения бойцов. Коллизии: на стороне движка.

use bevy::prelude::*;

pub mod movement;

// Re-export основных типов
pub use movement::{
    apply_character_motion, ground_detection, integrate_gravity, is_grounded, rotate_towards,
    GROUND_HEIGHT,
};

use crate::SimulationSet;

/// Plugin для character motor
///
/// ground_detection в начале тика, apply_character_motion в конце.
pub struct MotorPlugin;

impl Plugin for MotorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, ground_detection.in_set(SimulationSet::Sense))
            .add_systems(
                FixedUpdate,
                apply_character_motion.in_set(SimulationSet::Integrate),
            );
    }
}
