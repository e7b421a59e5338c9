// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Every connection carries the matching functions (normalize_name, fold_case)

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::domain::names::{fold_case, normalize_person_name};
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Default database file path
///
/// Path structure: {APP_DATA}/moviehub/moviehub.db
pub fn default_database_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join("moviehub").join("moviehub.db"))
}

/// Pragmas and SQL functions installed on every connection
fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    register_functions(conn)
}

/// Registers the name and title matching functions.
///
/// NULL arguments yield NULL.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("normalize_name", 1, flags, |ctx| {
        let name: Option<String> = ctx.get(0)?;
        Ok(name.map(|n| normalize_person_name(&n)))
    })?;

    conn.create_scalar_function("fold_case", 1, flags, |ctx| {
        let text: Option<String> = ctx.get(0)?;
        Ok(text.map(|t| fold_case(&t)))
    })?;

    Ok(())
}

/// Create a connection pool over the database file at `db_path`
///
/// The parent directory is created if missing.
pub fn create_connection_pool(db_path: &Path, max_size: u32) -> AppResult<ConnectionPool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);

    let pool = Pool::builder().max_size(max_size.max(1)).build(manager)?;

    log::debug!("Connection pool ready: {} (max {})", db_path.display(), max_size);
    Ok(pool)
}

/// Get a connection from the pool
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    Ok(pool.get()?)
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_functions(&conn)?;
    Ok(conn)
}
