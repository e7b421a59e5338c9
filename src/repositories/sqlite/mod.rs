// src/repositories/sqlite/mod.rs
//
// SQLite backend over an r2d2 connection pool

mod session;
mod sqlite_movie_repository;

pub use session::SessionContext;
pub use sqlite_movie_repository::SqliteMovieRepository;
