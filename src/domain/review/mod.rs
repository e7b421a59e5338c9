pub mod entity;
pub mod invariants;

pub use entity::{make_review, parse_timestamp, Review, MAX_RATING, MIN_RATING};
pub use invariants::{validate_review, validate_review_links};
