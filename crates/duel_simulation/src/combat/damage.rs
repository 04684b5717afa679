//! Damage messages между бойцами
//!
//! Бойцы не держат ссылок друг на друга: атака игрока шлёт `DamageRequested`
//! оппоненту, атака оппонента шлёт `HitReactionRequested` игроку.
//! Обработчики живут в player / ai модулях и сами проверяют guard'ы.

use bevy::prelude::*;

use crate::combat::{SequenceElapsed, SequenceStep};
use crate::logger;

/// Сообщение: нанести урон цели (TakeDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequested {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: u32,
}

/// Сообщение: запустить у цели отложенную реакцию на удар
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReactionRequested {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Событие: боец умер (health == 0)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantDied {
    pub entity: Entity,
}

/// Система: удаление павших бойцов по истечении `SequenceStep::Despawn`
pub fn despawn_fallen(mut commands: Commands, mut elapsed_events: EventReader<SequenceElapsed>) {
    for event in elapsed_events.read() {
        if event.step != SequenceStep::Despawn {
            continue;
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.despawn();
            logger::log_info(&format!("Combatant {:?} removed from scene", event.entity));
        }
    }
}
