// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - One contract (`MovieRepository`), two backends
// - Both backends answer every query identically for the same data
// - Repositories maintain reverse links; entities never embed each other
// - Explicit SQL only in the SQLite backend

pub mod memory_repository;
pub mod movie_repository;
pub mod sqlite;

#[cfg(test)]
mod contract_tests;

pub use memory_repository::MemoryMovieRepository;
pub use movie_repository::{MovieRepository, TOP_REVENUE_LIMIT};
pub use sqlite::{SessionContext, SqliteMovieRepository};

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
