// Re-export all model types from submodules
mod cards;
mod common;
mod search;

pub use cards::*;
pub use search::*;
