//! Duel Simulation Core
//!
//! ECS-симуляция дуэли 1v1 на Bevy 0.16 (headless)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state, combat rules, AI, timers (FixedUpdate 60Hz)
//! - Host engine = animator, audio, particles, UI, scene loading (через события)
//!
//! Порядок тика задаётся `SimulationSet`:
//! Sense → Sequences → Decide → Resolve → Integrate

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod camera;
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod player;
pub mod result;

// Re-export базовых компонентов для удобства
pub use ai::{opponent_bundle, AIPlugin, OpponentBrain, OpponentTuning};
pub use camera::{CameraFollow, CameraPlugin, MainCamera};
pub use combat::{
    AnimationCommand, AudioCue, CombatPlugin, CombatantDied, DamageRequested, EffectCommand,
    EffectHandle, HealthChanged, HitFeedback, HitReactionRequested,
};
pub use components::*;
pub use physics::MotorPlugin;
pub use player::{player_bundle, DamageQuirks, PlayerCommand, PlayerController, PlayerPlugin, PlayerTuning};
pub use result::{MatchOutcome, MatchResult, ResultDeclared, ResultPlugin, ReturnToMenu, SceneTransitionRequested};

// Re-export logger (host подставляет свой printer)
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};

/// Fixed timestep симуляции (60Hz)
pub const FIXED_TIMESTEP: Duration = Duration::from_nanos(16_666_667);

/// Seed по умолчанию
pub const DEFAULT_SEED: u64 = 42;

/// Фазы тика в FixedUpdate (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Ground check, setup validation, target acquisition
    Sense,
    /// Тик таймеров + обработка истёкших шагов
    Sequences,
    /// Команды игрока, locomotion, поведение оппонента
    Decide,
    /// Damage / hit reaction сообщения
    Resolve,
    /// Применение накопленного движения
    Integrate,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // RNG мог быть вставлен заранее (create_headless_app с seed): не перезаписываем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app
            // Fixed timestep 60Hz
            .insert_resource(Time::<Fixed>::from_duration(FIXED_TIMESTEP))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sense,
                    SimulationSet::Sequences,
                    SimulationSet::Decide,
                    SimulationSet::Resolve,
                    SimulationSet::Integrate,
                )
                    .chain(),
            )
            .add_plugins((
                CombatPlugin,
                MotorPlugin,
                PlayerPlugin,
                AIPlugin,
                CameraPlugin,
                ResultPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную: один `app.update()` = ровно один FixedUpdate тик
/// (кроме самого первого update, у которого delta = 0).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_TIMESTEP))
        .add_plugins(SimulationPlugin);

    app
}

/// Entity дуэльной сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelScene {
    pub player: Entity,
    pub opponent: Entity,
    pub camera: Entity,
}

/// Spawn стандартной сцены: камера, игрок в начале координат, оппонент на `distance` по +Z
pub fn spawn_duel(
    world: &mut World,
    player_tuning: PlayerTuning,
    opponent_tuning: OpponentTuning,
    distance: f32,
) -> DuelScene {
    let player = world
        .spawn(player_bundle(Vec3::ZERO, player_tuning))
        .insert(HitFeedback {
            hit_sounds: vec!["PlayerHit1".into(), "PlayerHit2".into(), "PlayerHit3".into()],
            death_sound: None,
            hit_effect: Some(EffectHandle::new("PlayerHitEffect")),
        })
        .id();

    let opponent = world
        .spawn(opponent_bundle(Vec3::new(0.0, 0.0, distance), opponent_tuning))
        .insert(HitFeedback {
            hit_sounds: vec!["OpponentHit1".into(), "OpponentHit2".into()],
            death_sound: Some("OpponentDeath".into()),
            hit_effect: Some(EffectHandle::new("OpponentHitEffect")),
        })
        .id();

    let follow = CameraFollow::new(vec![player]);
    let camera = world
        .spawn((
            Transform::from_translation(follow.offset + Vec3::Y * 3.0).looking_at(Vec3::ZERO, Vec3::Y),
            follow,
        ))
        .id();

    DuelScene {
        player,
        opponent,
        camera,
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
