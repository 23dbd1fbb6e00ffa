//! Combat systems (player side)

mod input;
mod locomotion;
mod reactions;
mod sequences;
mod sink;

// Re-export all systems
pub use input::*;
pub use locomotion::*;
pub use reactions::*;
pub use sequences::*;
pub use sink::*;
