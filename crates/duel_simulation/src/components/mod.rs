//! ECS Components для участников дуэли
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Combatant, Health, CombatState)
//! - movement: character motor, input axis, locomotion flags

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
