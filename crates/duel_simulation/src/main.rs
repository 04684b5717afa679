//! Headless дуэль
//!
//! Запускает Bevy App без рендера: игрок идёт к оппоненту и атакует по кругу
//! всеми четырьмя слотами, пока не будет объявлен результат.

use bevy::prelude::*;
use duel_simulation::{
    create_headless_app, spawn_duel, MatchResult, MovementInput, OpponentTuning, PlayerCommand,
    PlayerTuning, DEFAULT_SEED,
};

/// Лимит тиков (60Hz → 2 минуты)
const MAX_TICKS: u32 = 7200;
/// Дистанция, с которой игрок начинает атаковать
const ENGAGE_DISTANCE: f32 = 2.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    println!("Starting headless duel (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let scene = spawn_duel(
        app.world_mut(),
        PlayerTuning::default(),
        OpponentTuning::default(),
        6.0,
    );

    let mut slot = 0;

    for tick in 0..MAX_TICKS {
        if app.world().resource::<MatchResult>().is_declared() {
            break;
        }

        let positions = (
            app.world().get::<Transform>(scene.player).map(|t| t.translation),
            app.world().get::<Transform>(scene.opponent).map(|t| t.translation),
        );

        if let (Some(player), Some(opponent)) = positions {
            let engaged = player.distance(opponent) <= ENGAGE_DISTANCE;

            if let Some(mut input) = app.world_mut().get_mut::<MovementInput>(scene.player) {
                input.axis = if engaged { Vec2::ZERO } else { Vec2::Y };
            }

            if engaged && tick % 20 == 0 {
                app.world_mut().send_event(PlayerCommand::Attack { slot });
                slot = (slot + 1) % 4;
            }
        }

        app.update();

        if tick % 300 == 0 {
            let health = |entity| {
                app.world()
                    .get::<duel_simulation::Health>(entity)
                    .map_or(0, |h| h.current)
            };
            println!(
                "Tick {}: player {} HP, opponent {} HP",
                tick,
                health(scene.player),
                health(scene.opponent)
            );
        }
    }

    match app.world().resource::<MatchResult>().outcome {
        Some(outcome) => println!("Duel finished: {}", outcome.text()),
        None => println!("Duel did not finish within {} ticks", MAX_TICKS),
    }
}
