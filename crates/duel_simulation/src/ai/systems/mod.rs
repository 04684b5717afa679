//! AI systems (opponent behaviour + reactions)

pub mod fsm;
pub mod reactions;

#[cfg(test)]
mod reactions_tests;

// Re-export all systems
pub use fsm::*;
pub use reactions::*;
