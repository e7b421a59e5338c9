// src/repositories/sqlite/session.rs
//
// Unit-of-work scope for the SQLite backend
//
// RULES:
// - One pooled connection per session, acquired on first use
// - Every write runs in its own transaction: commit on Ok, rollback otherwise
// - A transaction dropped without commit rolls back
// - The session ends with `close_current_session` or `reset_session`

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};

use crate::db::{get_connection, ConnectionPool, PooledConn};
use crate::error::{AppError, AppResult};

pub struct SessionContext {
    pool: Arc<ConnectionPool>,
    current: Mutex<Option<PooledConn>>,
}

impl SessionContext {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            current: Mutex::new(None),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Option<PooledConn>>> {
        self.current
            .lock()
            .map_err(|_| AppError::Other("Session lock poisoned".to_string()))
    }

    /// Runs `f` on the session connection, opening the session if needed
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut guard = self.lock()?;
        let conn = match guard.take() {
            Some(conn) => conn,
            None => {
                log::debug!("Opening database session");
                get_connection(&self.pool)?
            }
        };
        let conn = guard.insert(conn);
        f(conn)
    }

    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        self.with_connection(|conn| f(conn))
    }

    /// Runs `f` inside a transaction committed only when `f` succeeds
    pub fn write<T>(&self, f: impl FnOnce(&Transaction) -> AppResult<T>) -> AppResult<T> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let out = f(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }

    /// True while a connection is held
    pub fn is_open(&self) -> AppResult<bool> {
        Ok(self.lock()?.is_some())
    }

    /// Ends the current session and starts a fresh one
    pub fn reset_session(&self) -> AppResult<()> {
        let mut guard = self.lock()?;
        guard.take();
        *guard = Some(get_connection(&self.pool)?);
        log::debug!("Database session reset");
        Ok(())
    }

    /// Returns the connection to the pool. The next call opens a new session.
    pub fn close_current_session(&self) -> AppResult<()> {
        if self.lock()?.take().is_some() {
            log::debug!("Database session closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, initialize_database};

    fn session() -> (tempfile::TempDir, SessionContext) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("session.db"), 2).unwrap();
        let session = SessionContext::new(Arc::new(pool));
        session.read(|conn| initialize_database(conn)).unwrap();
        (dir, session)
    }

    fn genre_count(session: &SessionContext) -> i64 {
        session
            .read(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM genres", [], |r| r.get(0))?))
            .unwrap()
    }

    #[test]
    fn test_write_commits_on_success() {
        let (_dir, session) = session();
        session
            .write(|tx| {
                tx.execute("INSERT INTO genres (id, name) VALUES (1, 'Drama')", [])?;
                Ok(())
            })
            .unwrap();
        assert_eq!(genre_count(&session), 1);
    }

    #[test]
    fn test_write_rolls_back_on_error() {
        let (_dir, session) = session();
        let result: AppResult<()> = session.write(|tx| {
            tx.execute("INSERT INTO genres (id, name) VALUES (1, 'Drama')", [])?;
            Err(AppError::Other("abort".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(genre_count(&session), 0);
    }

    #[test]
    fn test_session_lifecycle() {
        let (_dir, session) = session();
        assert!(session.is_open().unwrap());

        session.close_current_session().unwrap();
        assert!(!session.is_open().unwrap());

        assert_eq!(genre_count(&session), 0);
        assert!(session.is_open().unwrap());

        session.reset_session().unwrap();
        assert!(session.is_open().unwrap());
    }
}
