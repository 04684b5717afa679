//! AI reaction systems (damage, hit reaction sequence, death).

use bevy::prelude::*;

use crate::ai::{
    OpponentBrain, OpponentTuning, DEATH_ANIMATION, DEATH_TRIGGER, HIT_TRIGGER,
    OPPONENT_HIT_ANIMATION,
};
use crate::combat::{
    CombatantDied, DamageRequested, FeedbackWriters, HitFeedback, SequenceElapsed, SequenceStep,
    Sequences,
};
use crate::components::{CharacterMotor, CombatState, Health, Locomotion};
use crate::logger;
use crate::player::PlayerController;
use crate::DeterministicRng;

/// Снять застрявший guard TakingDamage (debug hook)
///
/// Отменяет запланированные шаги hit reaction. Возвращает true если guard был снят.
pub fn reset_damage_state(state: &mut CombatState, sequences: &mut Sequences) -> bool {
    if !state.is_taking_damage() {
        return false;
    }

    *state = CombatState::Idle;
    sequences.cancel_where(SequenceStep::is_hit_reaction);
    true
}

/// Смерть оппонента (идемпотентно)
///
/// Motor выключается, все таймеры отменяются, через despawn_delay: удаление из сцены.
#[allow(clippy::too_many_arguments)]
fn kill_opponent(
    entity: Entity,
    state: &mut CombatState,
    brain: &mut OpponentBrain,
    sequences: &mut Sequences,
    motor: &mut CharacterMotor,
    tuning: &OpponentTuning,
    hit_feedback: Option<&HitFeedback>,
    feedback: &mut FeedbackWriters,
    died_events: &mut EventWriter<CombatantDied>,
) {
    if state.is_dead() {
        return;
    }

    *state = CombatState::Dead;
    brain.attack_reset = None;
    sequences.cancel_where(|_| true);
    sequences.schedule(SequenceStep::Despawn, tuning.despawn_delay);

    motor.enabled = false;
    motor.take_motion();

    feedback.sound(entity, hit_feedback.and_then(|f| f.death_sound.clone()));
    feedback.trigger(entity, DEATH_TRIGGER);
    feedback.play(entity, DEATH_ANIMATION, false);

    died_events.write(CombatantDied { entity });
    logger::log_info(&format!("Opponent {:?} died", entity));
}

/// System: TakeDamage оппонента (DamageRequested с target = оппонент)
///
/// Порядок:
/// 1. Stuck recovery: guard держится дольше 2× hit_duration → сброс
/// 2. Guard: мёртв / уже в hit reaction → drop
/// 3. Урон, отмена текущей атаки, эффект + звук
/// 4. Смерть или старт hit reaction (HitLand через hit_initial_delay)
pub fn opponent_take_damage(
    mut damage_events: EventReader<DamageRequested>,
    mut opponents: Query<(
        &mut Health,
        &mut CombatState,
        &mut OpponentBrain,
        &mut Sequences,
        &mut CharacterMotor,
        &OpponentTuning,
        Option<&HitFeedback>,
    )>,
    mut died_events: EventWriter<CombatantDied>,
    mut feedback: FeedbackWriters,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        let Ok((
            mut health,
            mut state,
            mut brain,
            mut sequences,
            mut motor,
            tuning,
            hit_feedback,
        )) = opponents.get_mut(event.target)
        else {
            continue;
        };

        if let Some(age) = state.damage_guard_age(now) {
            if age > tuning.stuck_guard_threshold() {
                logger::log_warning(&format!(
                    "Opponent {:?} stuck in hit reaction for {:.2}s, resetting",
                    event.target, age
                ));
                reset_damage_state(&mut state, &mut sequences);
            }
        }

        if state.is_dead() || state.is_taking_damage() {
            logger::log(&format!(
                "Opponent {:?} ignoring {} damage ({:?})",
                event.target, event.amount, *state
            ));
            continue;
        }

        health.take_damage(event.amount);
        feedback.publish_health(event.target, &health);
        logger::log(&format!(
            "Opponent {:?} took {} damage → {}/{}",
            event.target, event.amount, health.current, health.max
        ));

        if *state == CombatState::Attacking {
            *state = CombatState::Idle;
            if let Some(reset) = brain.attack_reset.take() {
                sequences.cancel(reset);
            }
        }

        if let Some(hit_feedback) = hit_feedback {
            if let Some(effect) = &hit_feedback.hit_effect {
                feedback.restart_effect(event.target, effect);
            }
            feedback.sound(event.target, hit_feedback.pick_hit_sound(&mut rng));
        }

        if !health.is_alive() {
            kill_opponent(
                event.target,
                &mut state,
                &mut brain,
                &mut sequences,
                &mut motor,
                tuning,
                hit_feedback,
                &mut feedback,
                &mut died_events,
            );
        } else {
            *state = CombatState::TakingDamage { since: now };
            sequences.schedule(SequenceStep::OpponentHitLand, tuning.hit_initial_delay);
        }
    }
}

/// System: истёкшие шаги оппонента (HitLand → HitRecover, AttackReset)
pub fn resolve_opponent_sequences(
    mut elapsed_events: EventReader<SequenceElapsed>,
    mut opponents: Query<
        (
            &Transform,
            &Health,
            &mut CombatState,
            &mut OpponentBrain,
            &mut Sequences,
            &mut Locomotion,
            &OpponentTuning,
        ),
        Without<PlayerController>,
    >,
    players: Query<&Transform, With<PlayerController>>,
    mut feedback: FeedbackWriters,
) {
    for event in elapsed_events.read() {
        let Ok((transform, health, mut state, mut brain, mut sequences, mut locomotion, tuning)) =
            opponents.get_mut(event.entity)
        else {
            continue;
        };

        match event.step {
            SequenceStep::OpponentHitLand => {
                if !state.is_taking_damage() {
                    continue;
                }

                feedback.set_walking(event.entity, &mut locomotion, false);
                feedback.play(event.entity, OPPONENT_HIT_ANIMATION, true);
                feedback.trigger(event.entity, HIT_TRIGGER);
                sequences.schedule(SequenceStep::OpponentHitRecover, tuning.hit_duration);
            }

            SequenceStep::OpponentHitRecover => {
                if !state.is_taking_damage() {
                    continue;
                }

                *state = CombatState::Idle;

                let out_of_range = brain
                    .target
                    .and_then(|target| players.get(target).ok())
                    .is_some_and(|target| {
                        transform.translation.distance(target.translation) > tuning.attack_radius
                    });

                if health.is_alive() && out_of_range {
                    feedback.set_walking(event.entity, &mut locomotion, true);
                }
            }

            SequenceStep::AttackReset => {
                brain.attack_reset = None;
                if *state == CombatState::Attacking {
                    *state = CombatState::Idle;
                }
            }

            _ => {}
        }
    }
}
