//! Tests for opponent reaction helpers

use super::reactions::reset_damage_state;
use crate::combat::{SequenceStep, Sequences};
use crate::components::CombatState;

#[test]
fn test_reset_damage_state_clears_guard_and_hit_steps() {
    let mut state = CombatState::TakingDamage { since: 0.0 };
    let mut sequences = Sequences::default();
    sequences.schedule(SequenceStep::OpponentHitRecover, 0.5);
    sequences.schedule(SequenceStep::Despawn, 3.0);

    assert!(reset_damage_state(&mut state, &mut sequences));
    assert_eq!(state, CombatState::Idle);
    assert!(!sequences.contains(SequenceStep::is_hit_reaction));
    assert_eq!(sequences.len(), 1);
}

#[test]
fn test_reset_damage_state_noop_when_not_guarded() {
    let mut state = CombatState::Attacking;
    let mut sequences = Sequences::default();
    sequences.schedule(SequenceStep::AttackReset, 1.0);

    assert!(!reset_damage_state(&mut state, &mut sequences));
    assert_eq!(state, CombatState::Attacking);
    assert_eq!(sequences.len(), 1);
}
