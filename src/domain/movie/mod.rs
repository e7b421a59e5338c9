pub mod entity;
pub mod invariants;

pub use entity::Movie;
pub use invariants::{validate_movie, MIN_RELEASE_YEAR};
