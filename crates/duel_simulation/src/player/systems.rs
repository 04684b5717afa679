//! Player systems: locomotion, attack, dodge, damage reactions
//!
//! Все системы в FixedUpdate. Порядок задаётся через SimulationSet (см. PlayerPlugin).

use bevy::prelude::*;

use crate::ai::OpponentBrain;
use crate::camera::MainCamera;
use crate::combat::{
    CombatantDied, DamageRequested, FeedbackWriters, HitFeedback, HitReactionRequested,
    SequenceElapsed, SequenceStep, Sequences,
};
use crate::components::{CharacterMotor, CombatState, Health, Locomotion, MovementInput};
use crate::logger;
use crate::physics::{integrate_gravity, rotate_towards};
use crate::player::{
    check_player_setup, ControllerDisabled, DodgeMotion, PlayerCommand, PlayerController,
    PlayerTuning, DODGE_ANIMATION, PLAYER_HIT_ANIMATION,
};
use crate::DeterministicRng;

/// Порог длины input вектора (ниже: стоим)
const MOVE_DEADZONE: f32 = 0.1;

/// Cooldown атаки: строго больше cooldown с прошлой атаки
pub fn attack_ready(last_attack_at: Option<f32>, now: f32, cooldown: f32) -> bool {
    last_attack_at.map_or(true, |last| now - last > cooldown)
}

/// Cooldown уклонения: не раньше last + cooldown
pub fn dodge_ready(last_dodge_at: Option<f32>, now: f32, cooldown: f32) -> bool {
    last_dodge_at.map_or(true, |last| now >= last + cooldown)
}

/// Направление движения относительно камеры (горизонтальная плоскость, не нормализовано)
pub fn camera_relative_direction(camera: &Transform, axis: Vec2) -> Vec3 {
    let forward = flatten(*camera.forward());
    let right = flatten(*camera.right());
    forward * axis.y + right * axis.x
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Все цели в радиусе (distance ≤ radius) на момент атаки
pub fn targets_in_radius(
    origin: Vec3,
    radius: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Vec<Entity> {
    candidates
        .into_iter()
        .filter(|(_, position)| origin.distance(*position) <= radius)
        .map(|(entity, _)| entity)
        .collect()
}

fn is_player_reaction(step: &SequenceStep) -> bool {
    matches!(step, SequenceStep::PlayerHitReaction { .. })
}

/// Переход в Dead (идемпотентно): уклонение и отложенные реакции снимаются
fn kill_player(
    entity: Entity,
    health: &Health,
    state: &mut CombatState,
    controller: &mut PlayerController,
    sequences: &mut Sequences,
    feedback: &mut FeedbackWriters,
    died_events: &mut EventWriter<CombatantDied>,
) {
    if state.is_dead() {
        return;
    }

    *state = CombatState::Dead;
    controller.dodge = None;
    sequences.cancel_where(is_player_reaction);
    feedback.publish_health(entity, health);

    died_events.write(CombatantDied { entity });
    logger::log_info("player died");
}

/// Система: проверка зависимостей при spawn контроллера
///
/// Ошибка → ControllerDisabled + log, без retry. Успех → health bar заполняется.
pub fn validate_player_setup(
    mut commands: Commands,
    added: Query<(Entity, &PlayerTuning, &Health), Added<PlayerController>>,
    cameras: Query<(), With<MainCamera>>,
    mut feedback: FeedbackWriters,
) {
    let camera_present = !cameras.is_empty();

    for (entity, tuning, health) in added.iter() {
        match check_player_setup(camera_present, tuning) {
            Ok(()) => feedback.publish_health(entity, health),
            Err(err) => {
                logger::log_error(&format!("Player {:?} disabled: {}", entity, err));
                commands.entity(entity).insert(ControllerDisabled);
            }
        }
    }
}

/// Система: attack / dodge команды с UI кнопок
pub fn process_player_commands(
    mut command_events: EventReader<PlayerCommand>,
    mut players: Query<
        (
            Entity,
            &Transform,
            &PlayerTuning,
            &Health,
            &mut PlayerController,
            &mut CombatState,
        ),
        Without<ControllerDisabled>,
    >,
    opponents: Query<(Entity, &Transform), (With<OpponentBrain>, Without<PlayerController>)>,
    mut damage_events: EventWriter<DamageRequested>,
    mut feedback: FeedbackWriters,
    time: Res<Time<Fixed>>,
) {
    let commands: Vec<PlayerCommand> = command_events.read().copied().collect();
    if commands.is_empty() {
        return;
    }

    let now = time.elapsed_secs();

    for (entity, transform, tuning, health, mut controller, mut state) in players.iter_mut() {
        for command in &commands {
            if state.is_dead() || !health.is_alive() {
                logger::log(&format!("Player {:?} is dead, ignoring {:?}", entity, command));
                continue;
            }

            match *command {
                PlayerCommand::Attack { slot } => {
                    let Some(attack) = tuning.attack_moves.get(slot) else {
                        logger::log_warning(&format!("Player attack slot {} is not configured", slot));
                        continue;
                    };

                    if !attack_ready(controller.last_attack_at, now, tuning.attack_cooldown) {
                        let remaining = controller
                            .last_attack_at
                            .map_or(0.0, |last| tuning.attack_cooldown - (now - last));
                        logger::log(&format!(
                            "Cannot perform attack yet. Cooldown time remaining: {:.3}",
                            remaining
                        ));
                        continue;
                    }

                    feedback.play(entity, &attack.animation, false);
                    if let Some(effect) = &attack.effect {
                        feedback.play_effect(entity, effect);
                    }
                    controller.last_attack_at = Some(now);

                    let hits = targets_in_radius(
                        transform.translation,
                        tuning.attack_radius,
                        opponents.iter().map(|(e, t)| (e, t.translation)),
                    );

                    logger::log(&format!(
                        "Player performing attack {} with {} damage ({} targets)",
                        slot + 1,
                        attack.damage,
                        hits.len()
                    ));

                    for target in hits {
                        damage_events.write(DamageRequested {
                            attacker: entity,
                            target,
                            amount: attack.damage,
                        });
                    }
                }

                PlayerCommand::Dodge => {
                    if *state != CombatState::Idle
                        || !dodge_ready(controller.last_dodge_at, now, tuning.dodge_cooldown)
                    {
                        logger::log(&format!("Player {:?} dodge rejected ({:?})", entity, *state));
                        continue;
                    }

                    *state = CombatState::Dodging;
                    controller.last_dodge_at = Some(now);
                    controller.dodge = Some(DodgeMotion::new(
                        transform.translation,
                        *transform.forward(),
                        tuning.dodge_distance,
                        tuning.dodge_duration,
                    ));
                    feedback.play(entity, DODGE_ANIMATION, false);
                }
            }
        }
    }
}

/// Система: ходьба + гравитация (пропускается во время уклонения и после смерти)
pub fn player_locomotion(
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &MovementInput,
            &PlayerTuning,
            &Health,
            &CombatState,
            &mut CharacterMotor,
            &mut Locomotion,
        ),
        (With<PlayerController>, Without<ControllerDisabled>),
    >,
    cameras: Query<&Transform, (With<MainCamera>, Without<PlayerController>)>,
    mut feedback: FeedbackWriters,
    time: Res<Time<Fixed>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let delta = time.delta_secs();

    for (entity, mut transform, input, tuning, health, state, mut motor, mut locomotion) in
        players.iter_mut()
    {
        if matches!(state, CombatState::Dodging | CombatState::Dead) || !health.is_alive() {
            continue;
        }

        let movement = camera_relative_direction(camera, input.axis);

        if movement.length() > MOVE_DEADZONE {
            let direction = movement.normalize();
            rotate_towards(&mut transform, direction, tuning.rotation_speed, delta);

            let mut motion = direction * tuning.move_speed * delta;
            if motor.grounded {
                motor.vertical_velocity = 0.0;
            }
            motion.y = integrate_gravity(&mut motor, tuning.gravity, delta);

            motor.request_motion(motion);
            feedback.set_walking(entity, &mut locomotion, true);
        } else {
            feedback.set_walking(entity, &mut locomotion, false);
            if !motor.grounded {
                let fall = integrate_gravity(&mut motor, tuning.gravity, delta);
                motor.request_motion(Vec3::new(0.0, fall, 0.0));
            }
        }
    }
}

/// Система: интерполяция уклонения, по окончании: назад в Idle
pub fn advance_dodge(
    mut players: Query<(
        &Transform,
        &Health,
        &mut PlayerController,
        &mut CombatState,
        &mut CharacterMotor,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta();

    for (transform, health, mut controller, mut state, mut motor) in players.iter_mut() {
        if state.is_dead() || !health.is_alive() {
            controller.dodge = None;
            continue;
        }

        let Some(dodge) = controller.dodge.as_mut() else {
            continue;
        };

        let desired = dodge.advance(delta);
        let finished = dodge.is_finished();
        motor.request_motion(desired - transform.translation);

        if finished {
            controller.dodge = None;
            if *state == CombatState::Dodging {
                *state = CombatState::Idle;
            }
        }
    }
}

/// Система: TakeDamage игрока (DamageRequested с target = игрок)
///
/// Guard: уже идёт реакция или мёртв → drop. Урон применяется сразу,
/// повторно в реакции: только с quirks.double_apply. Health 0 → Dead на этом же тике.
pub fn player_take_damage(
    mut damage_events: EventReader<DamageRequested>,
    mut players: Query<(
        &mut Health,
        &mut CombatState,
        &mut PlayerController,
        &mut Sequences,
        &PlayerTuning,
        Option<&HitFeedback>,
    )>,
    mut died_events: EventWriter<CombatantDied>,
    mut rng: ResMut<DeterministicRng>,
    mut feedback: FeedbackWriters,
) {
    for event in damage_events.read() {
        let Ok((mut health, mut state, mut controller, mut sequences, tuning, hit_feedback)) =
            players.get_mut(event.target)
        else {
            continue;
        };

        logger::log(&format!("[Player] TakeDamage called with damage: {}", event.amount));

        let reacting = sequences.contains(is_player_reaction);
        if state.is_dead()
            || !health.is_alive()
            || (reacting && !tuning.quirks.unguarded_reactions)
        {
            logger::log("[Player] Already taking damage or dead, ignoring damage call");
            continue;
        }

        health.take_damage(event.amount);
        logger::log(&format!(
            "[Player] Health reduced to: {}/{}",
            health.current, health.max
        ));

        if let Some(hit_feedback) = hit_feedback {
            if let Some(effect) = &hit_feedback.hit_effect {
                feedback.play_effect(event.target, effect);
            }
            feedback.sound(event.target, hit_feedback.pick_hit_sound(&mut rng));
        }

        if !health.is_alive() {
            kill_player(
                event.target,
                &health,
                &mut state,
                &mut controller,
                &mut sequences,
                &mut feedback,
                &mut died_events,
            );
            continue;
        }

        let deferred = if tuning.quirks.double_apply { event.amount } else { 0 };
        sequences.schedule(
            SequenceStep::PlayerHitReaction { damage: deferred },
            tuning.reaction_delay,
        );
    }
}

/// Система: запуск отложенной реакции по сообщению от оппонента
pub fn start_player_hit_reactions(
    mut reaction_events: EventReader<HitReactionRequested>,
    mut players: Query<(&CombatState, &Health, &mut Sequences, &PlayerTuning), With<PlayerController>>,
) {
    for event in reaction_events.read() {
        let Ok((state, health, mut sequences, tuning)) = players.get_mut(event.target) else {
            continue;
        };

        if state.is_dead() || !health.is_alive() {
            continue;
        }

        if sequences.contains(is_player_reaction) && !tuning.quirks.unguarded_reactions {
            logger::log(&format!(
                "[Player] Reaction already in flight, dropping {} damage from {:?}",
                event.damage, event.attacker
            ));
            continue;
        }

        sequences.schedule(
            SequenceStep::PlayerHitReaction {
                damage: event.damage,
            },
            tuning.reaction_delay,
        );
    }
}

/// Система: истёкшие шаги реакции игрока (звук → урон → health bar → смерть/анимация)
pub fn resolve_player_sequences(
    mut elapsed_events: EventReader<SequenceElapsed>,
    mut players: Query<(
        &mut Health,
        &mut CombatState,
        &mut PlayerController,
        &mut Sequences,
        Option<&HitFeedback>,
    )>,
    mut died_events: EventWriter<CombatantDied>,
    mut rng: ResMut<DeterministicRng>,
    mut feedback: FeedbackWriters,
) {
    for event in elapsed_events.read() {
        let SequenceStep::PlayerHitReaction { damage } = event.step else {
            continue;
        };
        let Ok((mut health, mut state, mut controller, mut sequences, hit_feedback)) =
            players.get_mut(event.entity)
        else {
            continue;
        };

        // Мёртвый не получает урон повторно
        if state.is_dead() {
            continue;
        }

        match hit_feedback {
            Some(hit_feedback) => feedback.sound(event.entity, hit_feedback.pick_hit_sound(&mut rng)),
            None => logger::log_warning("Missing audio source or hit sounds!"),
        }

        health.take_damage(damage);

        if !health.is_alive() {
            kill_player(
                event.entity,
                &health,
                &mut state,
                &mut controller,
                &mut sequences,
                &mut feedback,
                &mut died_events,
            );
        } else {
            feedback.publish_health(event.entity, &health);
            feedback.play(event.entity, PLAYER_HIT_ANIMATION, true);
        }
    }
}
