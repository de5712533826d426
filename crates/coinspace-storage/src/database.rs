//! Database connection and initialization

use crate::{migrations, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Database connection wrapper
///
/// The connection sits behind a mutex so one `Database` can back several
/// stores shared across tasks.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!("Opened wallet database at {}", path.as_ref().display());
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<i32> {
        self.with_conn(migrations::get_schema_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_database() {
        let file = NamedTempFile::new().unwrap();
        let db = Database::open(file.path()).unwrap();
        assert_eq!(db.schema_version().unwrap(), migrations::SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let file = NamedTempFile::new().unwrap();
        {
            let db = Database::open(file.path()).unwrap();
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO local_store (key, value) VALUES ('k', 'v')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        }

        let db = Database::open(file.path()).unwrap();
        let value: String = db
            .with_conn(|conn| {
                let sql = "SELECT value FROM local_store WHERE key = 'k'";
                Ok(conn.query_row(sql, [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(value, "v");
    }

    #[test]
    fn test_in_memory_database() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), migrations::SCHEMA_VERSION);
    }
}
