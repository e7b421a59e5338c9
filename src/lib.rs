// src/lib.rs
// MovieHub - Movie catalog with interchangeable repository backends
//
// Architecture:
// - Domain-centric: entities and their invariants live in `domain`
// - One repository contract, an in-memory and a SQLite backend
// - Explicit: the loader builds a dataset, repositories import it
// - Services turn repository results into views and user-facing errors

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod loader;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    Actor, ActorId, Director, DirectorId, DomainError, DomainResult, Genre, GenreId, Movie,
    MovieId, Review, ReviewId, ScheduledMovie, User, UserId, WatchList, WatchingSimulation,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{MemoryMovieRepository, MovieRepository, SqliteMovieRepository};

// ============================================================================
// PUBLIC API - Loader & Services
// ============================================================================

pub use loader::{load_dataset, populate, CatalogDataset, PopulateSummary};

pub use services::{
    CatalogService, MovieView, ReviewView, ServiceError, ServiceResult, UserService, UserView,
    YearPage,
};

pub use config::{Config, RepositoryKind};
