// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`
//
// Entities never embed each other. Relations are typed id lists
// (see `ids`); reverse links are maintained by the repositories.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod actor;
pub mod director;
pub mod genre;
pub mod ids;
pub mod movie;
pub mod names;
pub mod review;
pub mod simulation;
pub mod user;
pub mod watchlist;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use ids::{ActorId, DirectorId, EntityKind, GenreId, MovieId, ReviewId, UserId};

// Movie Domain
pub use movie::{validate_movie, Movie, MIN_RELEASE_YEAR};

// People
pub use actor::{pair_colleagues, validate_actor, Actor};
pub use director::{validate_director, Director};

// Classification
pub use genre::{validate_genre, Genre};

// Reviews
pub use review::{
    make_review, parse_timestamp, validate_review, validate_review_links, Review,
};

// Users
pub use user::{validate_user, User};
pub use watchlist::{ScheduledMovie, WatchList};

pub use simulation::WatchingSimulation;

pub use names::{fold_case, normalize_person_name, normalize_username};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A review is not reachable from its author or its movie
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
