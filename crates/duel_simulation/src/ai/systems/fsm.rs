//! Opponent behaviour systems (target acquisition, chase, attack).

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{OpponentBrain, OpponentTuning};
use crate::combat::{opponent_roster, FeedbackWriters, HitReactionRequested, SequenceStep, Sequences};
use crate::components::{CharacterMotor, CombatState, Locomotion};
use crate::logger;
use crate::physics::{integrate_gravity, rotate_towards};
use crate::player::PlayerController;
use crate::DeterministicRng;

/// System: проверка roster атак при spawn (пустой → стандартные 4 удара)
pub fn validate_opponent_roster(
    mut opponents: Query<(Entity, &mut OpponentTuning), Added<OpponentBrain>>,
) {
    for (entity, mut tuning) in opponents.iter_mut() {
        if tuning.attack_moves.is_empty() {
            logger::log_warning(&format!(
                "Opponent {:?} has no attack moves, using default roster",
                entity
            ));
            tuning.attack_moves = opponent_roster();
        }
    }
}

/// System: захват цели (первый игрок в сцене)
///
/// Цель исчезла → сбрасываем и ищем заново. Игрока нет → error log один раз, оппонент стоит.
pub fn acquire_opponent_target(
    mut opponents: Query<(Entity, &mut OpponentBrain)>,
    players: Query<Entity, With<PlayerController>>,
) {
    for (entity, mut brain) in opponents.iter_mut() {
        if let Some(target) = brain.target {
            if players.contains(target) {
                continue;
            }
            brain.target = None;
        }

        match players.iter().next() {
            Some(player) => {
                brain.target = Some(player);
                brain.target_missing_reported = false;
                logger::log(&format!("Opponent {:?} acquired target {:?}", entity, player));
            }
            None if !brain.target_missing_reported => {
                brain.target_missing_reported = true;
                logger::log_error(&format!(
                    "Opponent {:?}: player not found in scene, AI idle",
                    entity
                ));
            }
            None => {}
        }
    }
}

/// System: per-tick поведение оппонента
///
/// Пропуск если мёртв / в hit reaction / нет цели.
/// - В радиусе: стоп, поворот к игроку, атака по cooldown
/// - Вне радиуса: идём к игроку по горизонтали
/// - Гравитация: на земле прижимаем (grounded_velocity), в воздухе интегрируем
pub fn opponent_behaviour(
    mut opponents: Query<
        (
            Entity,
            &mut Transform,
            &mut OpponentBrain,
            &OpponentTuning,
            &mut CombatState,
            &mut CharacterMotor,
            &mut Locomotion,
            &mut Sequences,
        ),
        Without<PlayerController>,
    >,
    players: Query<&Transform, With<PlayerController>>,
    mut reaction_events: EventWriter<HitReactionRequested>,
    mut feedback: FeedbackWriters,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (
        entity,
        mut transform,
        mut brain,
        tuning,
        mut state,
        mut motor,
        mut locomotion,
        mut sequences,
    ) in opponents.iter_mut()
    {
        if state.is_dead() || state.is_taking_damage() {
            continue;
        }

        let Some(target) = brain.target else {
            continue;
        };
        let Ok(target_transform) = players.get(target) else {
            continue;
        };

        let to_target = target_transform.translation - transform.translation;
        let distance = to_target.length();
        let mut motion = Vec3::ZERO;

        if distance <= tuning.attack_radius {
            feedback.set_walking(entity, &mut locomotion, false);
            rotate_towards(&mut transform, to_target, tuning.rotation_speed, delta);

            if *state != CombatState::Attacking
                && brain.attack_ready(now, tuning.attack_cooldown)
                && !tuning.attack_moves.is_empty()
            {
                let index = rng.rng.gen_range(0..tuning.attack_moves.len());
                let attack = &tuning.attack_moves[index];

                *state = CombatState::Attacking;
                brain.last_attack_at = Some(now);
                feedback.play(entity, &attack.animation, false);
                if let Some(effect) = &attack.effect {
                    feedback.play_effect(entity, effect);
                }

                reaction_events.write(HitReactionRequested {
                    attacker: entity,
                    target,
                    damage: attack.damage,
                });
                brain.attack_reset =
                    Some(sequences.schedule(SequenceStep::AttackReset, tuning.attack_reset_delay));

                logger::log(&format!(
                    "Opponent {:?} attack {} ({} damage)",
                    entity,
                    index + 1,
                    attack.damage
                ));
            }
        } else {
            let direction = Vec3::new(to_target.x, 0.0, to_target.z).normalize_or_zero();
            motion += direction * tuning.move_speed * delta;
            rotate_towards(&mut transform, direction, tuning.rotation_speed, delta);
            feedback.set_walking(entity, &mut locomotion, true);
        }

        if motor.grounded {
            motor.vertical_velocity = tuning.grounded_velocity;
            motion.y += motor.vertical_velocity * delta;
        } else {
            motion.y += integrate_gravity(&mut motor, tuning.gravity, delta);
        }

        motor.request_motion(motion);
    }
}
