// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod user_service;
pub mod views;

pub use catalog_service::{CatalogService, YearPage};
pub use user_service::UserService;
pub use views::{MovieView, ReviewView, UserView};

use thiserror::Error;

use crate::error::AppError;

/// Failures reported to service callers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No movie with id {0}")]
    NonExistentMovie(i64),

    #[error("No actor named {0}")]
    NonExistentActor(String),

    #[error("No director named {0}")]
    NonExistentDirector(String),

    #[error("No movies match the search")]
    NoSearchResults,

    #[error("Unknown user {0}")]
    UnknownUser(String),

    #[error("Username {0} is already taken")]
    NameNotUnique(String),

    #[error("Invalid username or password")]
    Authentication,

    #[error(transparent)]
    Repository(#[from] AppError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
