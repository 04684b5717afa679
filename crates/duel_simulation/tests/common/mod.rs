//! Общие helpers для интеграционных тестов дуэли

#![allow(dead_code)]

use bevy::prelude::*;
use duel_simulation::*;

/// Все feedback события, собранные за прогон
#[derive(Resource, Default, Debug)]
pub struct FeedbackLog {
    pub animations: Vec<AnimationCommand>,
    pub audio: Vec<AudioCue>,
    pub effects: Vec<EffectCommand>,
    pub health: Vec<HealthChanged>,
    pub died: Vec<CombatantDied>,
    pub results: Vec<ResultDeclared>,
    pub transitions: Vec<SceneTransitionRequested>,
}

impl FeedbackLog {
    pub fn deaths_of(&self, entity: Entity) -> usize {
        self.died.iter().filter(|d| d.entity == entity).count()
    }

    pub fn played(&self, entity: Entity, clip: &str) -> usize {
        self.animations
            .iter()
            .filter(|cmd| matches!(cmd, AnimationCommand::Play { entity: e, clip: c, .. } if *e == entity && c == clip))
            .count()
    }

    pub fn walking_changes(&self, entity: Entity) -> Vec<bool> {
        self.animations
            .iter()
            .filter_map(|cmd| match cmd {
                AnimationCommand::SetBool { entity: e, value, .. } if *e == entity => Some(*value),
                _ => None,
            })
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_feedback(
    mut log: ResMut<FeedbackLog>,
    mut animations: EventReader<AnimationCommand>,
    mut audio: EventReader<AudioCue>,
    mut effects: EventReader<EffectCommand>,
    mut health: EventReader<HealthChanged>,
    mut died: EventReader<CombatantDied>,
    mut results: EventReader<ResultDeclared>,
    mut transitions: EventReader<SceneTransitionRequested>,
) {
    log.animations.extend(animations.read().cloned());
    log.audio.extend(audio.read().cloned());
    log.effects.extend(effects.read().cloned());
    log.health.extend(health.read().copied());
    log.died.extend(died.read().copied());
    log.results.extend(results.read().copied());
    log.transitions.extend(transitions.read().cloned());
}

/// Headless App + сцена + сборщик событий. Первый (нулевой) update уже выполнен.
pub fn duel_app(
    seed: u64,
    player_tuning: PlayerTuning,
    opponent_tuning: OpponentTuning,
    distance: f32,
) -> (App, DuelScene) {
    let mut app = create_headless_app(seed);
    app.init_resource::<FeedbackLog>()
        .add_systems(Last, collect_feedback);

    let scene = spawn_duel(app.world_mut(), player_tuning, opponent_tuning, distance);
    app.update();

    (app, scene)
}

/// Оппонент, который не двигается и не атакует (radius 0 → всегда "вне радиуса", speed 0)
pub fn passive_opponent() -> OpponentTuning {
    OpponentTuning {
        move_speed: 0.0,
        attack_radius: 0.0,
        ..default()
    }
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Прогнать `seconds` симуляции (60 тиков в секунду, с округлением вверх)
pub fn run_seconds(app: &mut App, seconds: f32) {
    run_ticks(app, (seconds * 60.0).ceil() as usize);
}

pub fn health(app: &App, entity: Entity) -> Option<u32> {
    app.world().get::<Health>(entity).map(|h| h.current)
}

pub fn state(app: &App, entity: Entity) -> Option<CombatState> {
    app.world().get::<CombatState>(entity).copied()
}

pub fn position(app: &App, entity: Entity) -> Option<Vec3> {
    app.world().get::<Transform>(entity).map(|t| t.translation)
}

pub fn feedback(app: &App) -> &FeedbackLog {
    app.world().resource::<FeedbackLog>()
}

pub fn relative_speed(app: &App) -> f32 {
    app.world().resource::<Time<Virtual>>().relative_speed()
}

pub fn attack(app: &mut App, slot: usize) {
    app.world_mut().send_event(PlayerCommand::Attack { slot });
}

pub fn dodge(app: &mut App) {
    app.world_mut().send_event(PlayerCommand::Dodge);
}

pub fn set_health(app: &mut App, entity: Entity, current: u32) {
    if let Some(mut health) = app.world_mut().get_mut::<Health>(entity) {
        health.current = current;
    }
}
