pub mod entity;
pub mod invariants;

pub use entity::User;
pub use invariants::validate_user;
