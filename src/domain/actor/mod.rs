pub mod entity;
pub mod invariants;

pub use entity::{pair_colleagues, Actor};
pub use invariants::validate_actor;
