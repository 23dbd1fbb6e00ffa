//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: враги (Agent, AgentState, Health, AgentSnapshot)
//! - player: player control marker + Locomotion gate

pub mod actor;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
