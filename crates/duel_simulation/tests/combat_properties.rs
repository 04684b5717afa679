//! Свойства боя: реакции игрока, quirks, результат, монотонность health, детерминизм

mod common;

use bevy::prelude::*;
use common::*;
use duel_simulation::*;

fn request_reaction(app: &mut App, scene: &DuelScene, damage: u32) {
    app.world_mut().send_event(HitReactionRequested {
        attacker: scene.opponent,
        target: scene.player,
        damage,
    });
}

fn request_damage(app: &mut App, scene: &DuelScene, amount: u32) {
    app.world_mut().send_event(DamageRequested {
        attacker: scene.opponent,
        target: scene.player,
        amount,
    });
}

fn pending_reactions(app: &App, entity: Entity) -> usize {
    app.world()
        .get::<combat::Sequences>(entity)
        .map_or(0, |s| {
            s.count(|step| matches!(step, combat::SequenceStep::PlayerHitReaction { .. }))
        })
}

/// Повторный запрос реакции во время текущей: отбрасывается (урон один раз, таймер не перезапущен)
#[test]
fn test_concurrent_reaction_is_dropped() {
    let (mut app, scene) = duel_app(42, PlayerTuning::default(), passive_opponent(), 2.0);

    request_reaction(&mut app, &scene, 10);
    run_ticks(&mut app, 10);
    request_reaction(&mut app, &scene, 15);
    run_ticks(&mut app, 1);
    assert_eq!(pending_reactions(&app, scene.player), 1);

    run_seconds(&mut app, 1.0);
    assert_eq!(health(&app, scene.player), Some(90));
    assert_eq!(feedback(&app).played(scene.player, "HitDamageAnimation"), 1);

    // Health bar получил новое значение
    assert!(feedback(&app)
        .health
        .iter()
        .any(|h| h.entity == scene.player && h.current == 90 && h.max == 100));
}

/// unguarded_reactions: таймеры стекаются, урон применяется дважды
#[test]
fn test_unguarded_reactions_quirk_stacks() {
    let quirks = DamageQuirks {
        unguarded_reactions: true,
        ..default()
    };
    let (mut app, scene) = duel_app(
        42,
        PlayerTuning::default().with_quirks(quirks),
        passive_opponent(),
        2.0,
    );

    request_reaction(&mut app, &scene, 10);
    run_ticks(&mut app, 10);
    request_reaction(&mut app, &scene, 15);
    run_ticks(&mut app, 1);
    assert_eq!(pending_reactions(&app, scene.player), 2);

    run_seconds(&mut app, 1.0);
    assert_eq!(health(&app, scene.player), Some(75));
}

/// TakeDamage игрока: урон сразу, реакция без повторного урона
#[test]
fn test_take_damage_applies_once() {
    let (mut app, scene) = duel_app(42, PlayerTuning::default(), passive_opponent(), 2.0);

    request_damage(&mut app, &scene, 10);
    run_ticks(&mut app, 1);
    assert_eq!(health(&app, scene.player), Some(90));

    // Guard: пока идёт реакция, новый урон отбрасывается
    request_damage(&mut app, &scene, 10);
    run_ticks(&mut app, 1);
    assert_eq!(health(&app, scene.player), Some(90));

    run_seconds(&mut app, 1.0);
    assert_eq!(health(&app, scene.player), Some(90));

    // Эффект попадания + звук
    let fb = feedback(&app);
    assert!(fb.effects.iter().any(|cmd| matches!(
        cmd,
        EffectCommand::Play { entity, effect } if *entity == scene.player && effect.0 == "PlayerHitEffect"
    )));
    assert!(fb.audio.iter().any(|cue| cue.entity == scene.player));
}

/// double_apply: урон сразу и ещё раз в реакции
#[test]
fn test_double_apply_quirk() {
    let quirks = DamageQuirks {
        double_apply: true,
        ..default()
    };
    let (mut app, scene) = duel_app(
        42,
        PlayerTuning::default().with_quirks(quirks),
        passive_opponent(),
        2.0,
    );

    request_damage(&mut app, &scene, 10);
    run_ticks(&mut app, 1);
    assert_eq!(health(&app, scene.player), Some(90));

    run_seconds(&mut app, 1.0);
    assert_eq!(health(&app, scene.player), Some(80));
}

/// Смерть игрока → "you lose" ровно один раз, время заморожено, dead игрок не действует
#[test]
fn test_player_death_declares_defeat_once() {
    let (mut app, scene) = duel_app(42, PlayerTuning::default(), passive_opponent(), 2.0);
    set_health(&mut app, scene.player, 10);

    request_reaction(&mut app, &scene, 25);
    run_seconds(&mut app, 1.0);

    assert_eq!(health(&app, scene.player), Some(0));
    assert_eq!(state(&app, scene.player), Some(CombatState::Dead));
    assert_eq!(feedback(&app).deaths_of(scene.player), 1);
    assert_eq!(relative_speed(&app), 0.0);

    let results = &feedback(&app).results;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].outcome, MatchOutcome::Defeat);
    assert_eq!(results[0].text, "you lose");

    // Повторные кадры не объявляют результат заново
    run_seconds(&mut app, 2.0);
    assert_eq!(feedback(&app).results.len(), 1);

    // Меню: скорость 1, переход в MainMenu
    app.world_mut().send_event(ReturnToMenu);
    run_ticks(&mut app, 1);
    assert_eq!(relative_speed(&app), 1.0);
    assert_eq!(
        feedback(&app).transitions,
        vec![SceneTransitionRequested {
            scene: "MainMenu".to_string()
        }]
    );

    // Мёртвый игрок: атака и уклонение игнорируются, реакции не запускаются
    attack(&mut app, 0);
    dodge(&mut app);
    request_reaction(&mut app, &scene, 10);
    run_seconds(&mut app, 1.0);

    assert_eq!(health(&app, scene.opponent), Some(100));
    assert_eq!(state(&app, scene.player), Some(CombatState::Dead));
    assert_eq!(feedback(&app).deaths_of(scene.player), 1);
    assert_eq!(
        app.world().resource::<MatchResult>().outcome,
        Some(MatchOutcome::Defeat)
    );
}

/// Летальный TakeDamage: Dead на том же тике; после снятия паузы игрок не ходит и не бьёт
#[test]
fn test_zero_health_player_cannot_act_after_menu() {
    let (mut app, scene) = duel_app(42, PlayerTuning::default(), passive_opponent(), 2.0);

    request_damage(&mut app, &scene, 100);
    run_ticks(&mut app, 1);

    assert_eq!(health(&app, scene.player), Some(0));
    assert_eq!(state(&app, scene.player), Some(CombatState::Dead));
    assert_eq!(feedback(&app).deaths_of(scene.player), 1);
    assert_eq!(pending_reactions(&app, scene.player), 0);
    assert_eq!(relative_speed(&app), 0.0);
    assert_eq!(feedback(&app).results.len(), 1);
    assert_eq!(feedback(&app).results[0].text, "you lose");

    app.world_mut().send_event(ReturnToMenu);
    run_ticks(&mut app, 1);
    assert_eq!(relative_speed(&app), 1.0);

    let before = position(&app, scene.player);
    attack(&mut app, 0);
    dodge(&mut app);
    if let Some(mut input) = app.world_mut().get_mut::<MovementInput>(scene.player) {
        input.axis = Vec2::X;
    }
    run_seconds(&mut app, 1.0);

    assert_eq!(position(&app, scene.player), before);
    assert_eq!(health(&app, scene.opponent), Some(100));
    assert_eq!(state(&app, scene.player), Some(CombatState::Dead));
    assert_eq!(feedback(&app).deaths_of(scene.player), 1);
    assert_eq!(feedback(&app).played(scene.player, "DodgeFrontAnimation"), 0);
    assert_eq!(feedback(&app).results.len(), 1);
}

/// Залипшая hit reaction (hit_initial_delay > 2 × hit_duration): новый удар сбрасывает её
#[test]
fn test_stuck_hit_reaction_is_recovered_by_next_hit() {
    let opponent = OpponentTuning {
        hit_initial_delay: 0.6,
        hit_duration: 0.25,
        ..passive_opponent()
    };
    let (mut app, scene) = duel_app(
        42,
        PlayerTuning::default().with_attack_damage(10),
        opponent,
        2.0,
    );

    let hit_steps = |app: &App, step: combat::SequenceStep| {
        app.world()
            .get::<combat::Sequences>(scene.opponent)
            .map_or(0, |s| s.count(|pending| *pending == step))
    };

    attack(&mut app, 0);
    run_ticks(&mut app, 1);
    assert_eq!(health(&app, scene.opponent), Some(90));
    let Some(CombatState::TakingDamage { since: first }) = state(&app, scene.opponent) else {
        panic!("opponent is not taking damage: {:?}", state(&app, scene.opponent));
    };
    assert_eq!(hit_steps(&app, combat::SequenceStep::OpponentHitLand), 1);

    // Guard старше 0.5 s, HitLand (0.6 s) ещё не сработал
    run_seconds(&mut app, 0.55);
    assert!(state(&app, scene.opponent).is_some_and(|s| s.is_taking_damage()));
    assert_eq!(feedback(&app).played(scene.opponent, "HitDamageAnimation"), 0);

    attack(&mut app, 1);
    run_ticks(&mut app, 1);
    assert_eq!(health(&app, scene.opponent), Some(80));
    let Some(CombatState::TakingDamage { since: second }) = state(&app, scene.opponent) else {
        panic!("second hit was not accepted: {:?}", state(&app, scene.opponent));
    };
    assert!(second > first);

    // Старые HitLand/HitRecover отменены, в очереди только новый HitLand
    assert_eq!(hit_steps(&app, combat::SequenceStep::OpponentHitLand), 1);
    assert_eq!(hit_steps(&app, combat::SequenceStep::OpponentHitRecover), 0);

    run_seconds(&mut app, 0.65);
    assert_eq!(feedback(&app).played(scene.opponent, "HitDamageAnimation"), 1);

    run_seconds(&mut app, 0.3);
    assert_eq!(state(&app, scene.opponent), Some(CombatState::Idle));
    assert_eq!(feedback(&app).played(scene.opponent, "HitDamageAnimation"), 1);
}

/// Без камеры контроллер выключается; с камерой: публикуется начальный health
#[test]
fn test_player_setup_validation() {
    let mut app = create_headless_app(1);
    let player = app
        .world_mut()
        .spawn(player_bundle(Vec3::ZERO, PlayerTuning::default()))
        .id();
    run_ticks(&mut app, 2);
    assert!(app.world().get::<player::ControllerDisabled>(player).is_some());

    let (mut app, scene) = duel_app(1, PlayerTuning::default(), passive_opponent(), 2.0);
    run_ticks(&mut app, 1);
    assert!(app.world().get::<player::ControllerDisabled>(scene.player).is_none());
    assert!(feedback(&app)
        .health
        .iter()
        .any(|h| h.entity == scene.player && h.current == 100));
}

/// Оппонент без игрока в сцене: стоит, цель не захвачена
#[test]
fn test_opponent_without_player_idles() {
    let mut app = create_headless_app(1);
    let opponent = app
        .world_mut()
        .spawn(opponent_bundle(Vec3::new(0.0, 0.0, 3.0), OpponentTuning::default()))
        .id();
    run_ticks(&mut app, 10);

    let brain = app.world().get::<OpponentBrain>(opponent).cloned();
    assert_eq!(brain.as_ref().and_then(|b| b.target), None);
    assert_eq!(brain.map(|b| b.target_missing_reported), Some(true));
    assert_eq!(position(&app, opponent), Some(Vec3::new(0.0, 0.0, 3.0)));
    assert_eq!(state(&app, opponent), Some(CombatState::Idle));
}

/// Пустой roster заменяется стандартным
#[test]
fn test_empty_roster_replaced_with_defaults() {
    let tuning = OpponentTuning {
        attack_moves: Vec::new(),
        ..default()
    };
    let (mut app, scene) = duel_app(42, PlayerTuning::default(), tuning, 2.0);
    run_ticks(&mut app, 1);

    let moves = app
        .world()
        .get::<OpponentTuning>(scene.opponent)
        .map(|t| t.attack_moves.len());
    assert_eq!(moves, Some(4));
}

/// Полная дуэль: health никогда не растёт, результат объявляется
fn run_scripted_duel(seed: u64, ticks: usize) -> (App, DuelScene) {
    let (mut app, scene) = duel_app(
        seed,
        PlayerTuning::default().with_attack_damage(10),
        OpponentTuning::default(),
        4.0,
    );

    let mut last = (health(&app, scene.player), health(&app, scene.opponent));

    for tick in 0..ticks {
        if tick % 25 == 0 {
            attack(&mut app, tick / 25 % 4);
        }
        if tick % 300 == 150 {
            dodge(&mut app);
        }
        app.update();

        let now = (health(&app, scene.player), health(&app, scene.opponent));
        for (before, after) in [(last.0, now.0), (last.1, now.1)] {
            if let (Some(before), Some(after)) = (before, after) {
                assert!(after <= before, "health increased: {} → {}", before, after);
            }
        }
        last = now;
    }

    (app, scene)
}

#[test]
fn test_health_never_increases_in_full_duel() {
    let (app, _scene) = run_scripted_duel(42, 1800);

    assert!(app.world().resource::<MatchResult>().is_declared());
    assert_eq!(feedback(&app).results.len(), 1);
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let (mut app1, _) = run_scripted_duel(SEED, 900);
    let (mut app2, _) = run_scripted_duel(SEED, 900);

    assert_eq!(
        world_snapshot::<Health>(app1.world_mut()),
        world_snapshot::<Health>(app2.world_mut()),
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
    assert_eq!(
        world_snapshot::<Transform>(app1.world_mut()),
        world_snapshot::<Transform>(app2.world_mut())
    );
    assert_eq!(feedback(&app1).audio, feedback(&app2).audio);
    assert_eq!(feedback(&app1).animations, feedback(&app2).animations);
}
