//! AI systems: turn arbitration + reference agent behaviour

mod behaviour;
mod scheduler;

// Re-export all systems
pub use behaviour::*;
pub use scheduler::*;
