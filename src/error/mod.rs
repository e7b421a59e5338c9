// src/error/mod.rs
//
// Application error type shared by the database, repository and loader
// layers.

mod types;

pub use types::{AppError, AppResult};
