//! Combat plumbing, общий для игрока и оппонента
//!
//! ECS ответственность:
//! - Game state: Health, CombatState, Sequences (отложенные шаги)
//! - Messages: DamageRequested, HitReactionRequested, CombatantDied
//! - Feedback: AnimationCommand, AudioCue, EffectCommand, HealthChanged
//!
//! Host ответственность:
//! - Animator, AudioSource, ParticleSystem, health bar

use bevy::prelude::*;

pub mod attack_move;
pub mod damage;
pub mod feedback;
pub mod sequence;

// Re-export основных типов
pub use attack_move::{
    attack_clip, opponent_roster, player_roster, AttackMove, EffectHandle, ATTACK_SLOTS,
};
pub use damage::{CombatantDied, DamageRequested, HitReactionRequested};
pub use feedback::{
    AnimationCommand, AudioCue, EffectCommand, FeedbackWriters, HealthChanged, HitFeedback,
    WALKING_PARAM,
};
pub use sequence::{SequenceElapsed, SequenceId, SequenceStep, Sequences};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует события и общие системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. advance_sequences: тик таймеров всех бойцов (SimulationSet::Sequences)
/// 2. despawn_fallen: удаление мёртвых после задержки (после resolve шагов)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequested>()
            .add_event::<HitReactionRequested>()
            .add_event::<CombatantDied>()
            .add_event::<SequenceElapsed>()
            .add_event::<AnimationCommand>()
            .add_event::<AudioCue>()
            .add_event::<EffectCommand>()
            .add_event::<HealthChanged>();

        app.add_systems(
            FixedUpdate,
            (sequence::advance_sequences, damage::despawn_fallen)
                .chain()
                .in_set(SimulationSet::Sequences),
        );
    }
}
