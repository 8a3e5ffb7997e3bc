pub mod cards;
pub mod search;
