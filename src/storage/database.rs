use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Durable string-valued key-value storage backed by SQLite.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(data_dir: &Path) -> SqliteResult<Self> {
        std::fs::create_dir_all(data_dir).ok();
        let db_path = data_dir.join("quotesync.db");
        qlog!("Database: {}", db_path.display());

        Self::from_connection(Connection::open(&db_path)?)
    }

    pub fn open_in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_migrations(&self) -> SqliteResult<()> {
        self.conn().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS app_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
    }

    pub fn get_setting(&self, key: &str) -> SqliteResult<Option<String>> {
        self.conn()
            .query_row(
                "SELECT value FROM app_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Replace the value stored under `key`.
    pub fn set_setting(&self, key: &str, value: &str) -> SqliteResult<()> {
        self.conn().execute(
            "INSERT INTO app_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
