//! AI components

mod behaviour;
mod scheduler;

#[cfg(test)]
mod scheduler_tests;

// Re-export all components
pub use behaviour::*;
pub use scheduler::*;
