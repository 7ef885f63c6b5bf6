use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::data::FileEntry;

/// Errors of the persistence layer (library database and settings file)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine the user data directory")]
    NoDataDir,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The Library persists the last fetched file list so the catalog can
/// warm-start before the repository is read again.
pub struct Library {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open the library in the user's data directory:
    /// - Linux: ~/.local/share/texture-viewer/library.db
    /// - macOS: ~/Library/Application Support/texture-viewer/library.db
    /// - Windows: %APPDATA%\texture-viewer\library.db
    pub fn new() -> StorageResult<Self> {
        let db_path = Self::get_db_path()?;
        Self::open(&db_path)
    }

    /// Open or create the library at an explicit location
    pub fn open(db_path: &Path) -> StorageResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        log::info!("📁 Library opened at: {}", db_path.display());

        let mut library = Library {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Library that lives only as long as the process
    pub fn open_in_memory() -> StorageResult<Self> {
        let mut library = Library {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    fn get_db_path() -> StorageResult<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(StorageError::NoDataDir)?;

        path.push("texture-viewer");
        path.push("library.db");
        Ok(path)
    }

    /// Create the tables if they don't exist.
    fn init_schema(&mut self) -> StorageResult<()> {
        // One row per catalog entry; `position` keeps the upstream order
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS files (
                position        INTEGER PRIMARY KEY,
                path            TEXT NOT NULL,
                entry_json      TEXT NOT NULL
            )",
            [],
        )?;

        // Single-row table describing where the stored list came from
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS refresh (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                repo            TEXT NOT NULL,
                refreshed_at    INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Replace the stored file list wholesale
    pub fn save_files(&mut self, repo: &str, files: &[FileEntry]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM files", [])?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO files (position, path, entry_json) VALUES (?1, ?2, ?3)")?;
            for (position, entry) in files.iter().enumerate() {
                let json = serde_json::to_string(entry)?;
                stmt.execute(params![position as i64, &entry.path, json])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO refresh (id, repo, refreshed_at) VALUES (1, ?1, ?2)",
            params![repo, Utc::now().timestamp()],
        )?;
        tx.commit()?;

        log::info!("💾 Stored {} files for {}", files.len(), repo);
        Ok(())
    }

    /// Load the stored file list in its original order
    pub fn load_files(&self) -> StorageResult<Vec<FileEntry>> {
        let mut stmt = self.conn.prepare("SELECT entry_json FROM files ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut files = Vec::new();
        for json in rows {
            files.push(serde_json::from_str(&json?)?);
        }
        Ok(files)
    }

    /// Repository and time of the last stored refresh
    pub fn last_refresh(&self) -> StorageResult<Option<(String, DateTime<Utc>)>> {
        let row = self
            .conn
            .query_row("SELECT repo, refreshed_at FROM refresh WHERE id = 1", [], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .optional()?;

        Ok(row.and_then(|(repo, ts)| {
            Utc.timestamp_opt(ts, 0).single().map(|at| (repo, at))
        }))
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
