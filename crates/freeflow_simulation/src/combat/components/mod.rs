//! Combat components (player side)

mod detection;
mod player_combat;
mod sequences;


// Re-export all components
pub use detection::*;
pub use player_combat::*;
pub use sequences::*;
