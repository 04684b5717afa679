//! Result manager: победа / поражение, заморозка времени, возврат в меню
//!
//! Работает в Update: при relative_speed = 0 FixedUpdate стоит, а результат
//! и запрос возврата в меню должны обрабатываться дальше.

use bevy::prelude::*;

use crate::components::{Combatant, Health, Side};
use crate::logger;

/// Текст панели поражения
pub const DEFEAT_TEXT: &str = "you lose";
/// Текст панели победы
pub const VICTORY_TEXT: &str = "you win";
/// Сцена главного меню
pub const MAIN_MENU_SCENE: &str = "MainMenu";

/// Исход дуэли
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Victory,
    Defeat,
}

impl MatchOutcome {
    pub fn text(&self) -> &'static str {
        match self {
            MatchOutcome::Victory => VICTORY_TEXT,
            MatchOutcome::Defeat => DEFEAT_TEXT,
        }
    }
}

/// Объявленный результат (latched: после объявления не меняется)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: Option<MatchOutcome>,
}

impl MatchResult {
    pub fn is_declared(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Событие для UI: показать панель результата
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultDeclared {
    pub outcome: MatchOutcome,
    pub text: &'static str,
}

/// Запрос с кнопки "в меню"
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReturnToMenu;

/// Событие для host: загрузить сцену
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneTransitionRequested {
    pub scene: String,
}

/// Исход по health бойцов: сначала проигрыш игрока, потом победа
pub fn decide_outcome<'a>(combatants: impl IntoIterator<Item = (Side, &'a Health)>) -> Option<MatchOutcome> {
    let mut player_down = false;
    let mut opponent_down = false;

    for (side, health) in combatants {
        if health.is_alive() {
            continue;
        }

        match side {
            Side::Player => player_down = true,
            Side::Opponent => opponent_down = true,
        }
    }

    if player_down {
        Some(MatchOutcome::Defeat)
    } else if opponent_down {
        Some(MatchOutcome::Victory)
    } else {
        None
    }
}

/// System: проверка исхода (idempotent)
pub fn evaluate_match_result(
    mut result: ResMut<MatchResult>,
    combatants: Query<(&Combatant, &Health)>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut declared_events: EventWriter<ResultDeclared>,
) {
    if result.is_declared() {
        return;
    }

    let Some(outcome) = decide_outcome(combatants.iter().map(|(c, h)| (c.side, h))) else {
        return;
    };

    result.outcome = Some(outcome);
    virtual_time.set_relative_speed(0.0);

    declared_events.write(ResultDeclared {
        outcome,
        text: outcome.text(),
    });
    logger::log_info(&format!("Match over: {}", outcome.text()));
}

/// System: возврат в меню (снимает паузу, просит host загрузить MainMenu)
pub fn handle_return_to_menu(
    mut requests: EventReader<ReturnToMenu>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut transitions: EventWriter<SceneTransitionRequested>,
) {
    if requests.read().count() == 0 {
        return;
    }

    virtual_time.set_relative_speed(1.0);
    transitions.write(SceneTransitionRequested {
        scene: MAIN_MENU_SCENE.to_string(),
    });
    logger::log_info("Returning to main menu");
}

/// Result Plugin
pub struct ResultPlugin;

impl Plugin for ResultPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchResult>()
            .add_event::<ResultDeclared>()
            .add_event::<ReturnToMenu>()
            .add_event::<SceneTransitionRequested>()
            .add_systems(Update, (evaluate_match_result, handle_return_to_menu).chain());
    }
}
