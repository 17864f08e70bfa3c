use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub const HIGH_SCORE_KEY: &str = "highScore";

/// Persistence port for the high score: loaded once at startup, written
/// whenever a completed session beats it.
pub trait ScoreStore {
    fn load_high_score(&self) -> u64;
    fn save_high_score(&self, words: u64) -> rusqlite::Result<()>;
}

/// SQLite-backed key-value store holding the high score.
#[derive(Debug)]
pub struct ScoreDb {
    conn: Connection,
}

impl ScoreDb {
    /// Open the database at its platform path, creating tables if needed.
    pub fn new() -> rusqlite::Result<Self> {
        let db_path = crate::app_dirs::AppDirs::db_path()
            .unwrap_or_else(|| PathBuf::from("typedash_scores.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS scoreboard (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(ScoreDb { conn })
    }

    fn get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM scoreboard WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
    }

    fn set(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO scoreboard (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;

        Ok(())
    }
}

impl ScoreStore for ScoreDb {
    /// Missing or unparsable values read as 0.
    fn load_high_score(&self) -> u64 {
        match self.get(HIGH_SCORE_KEY) {
            Ok(Some(value)) => value.trim().parse().unwrap_or(0),
            Ok(None) | Err(_) => 0,
        }
    }

    /// The value is stored as a decimal string.
    fn save_high_score(&self, words: u64) -> rusqlite::Result<()> {
        self.set(HIGH_SCORE_KEY, &words.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_high_score_reads_zero() {
        let dir = tempdir().unwrap();
        let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();

        assert_eq!(db.load_high_score(), 0);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.db");

        {
            let db = ScoreDb::open(&path).unwrap();
            db.save_high_score(42).unwrap();
        }

        // survives reopening the database
        let db = ScoreDb::open(&path).unwrap();
        assert_eq!(db.load_high_score(), 42);
    }

    #[test]
    fn value_is_stored_as_decimal_string() {
        let dir = tempdir().unwrap();
        let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();

        db.save_high_score(137).unwrap();

        assert_eq!(db.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("137"));
    }

    #[test]
    fn malformed_value_reads_zero() {
        let dir = tempdir().unwrap();
        let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();

        db.set(HIGH_SCORE_KEY, "not a number").unwrap();
        assert_eq!(db.load_high_score(), 0);

        // first qualifying session overwrites it
        db.save_high_score(9).unwrap();
        assert_eq!(db.load_high_score(), 9);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();

        db.save_high_score(10).unwrap();
        db.save_high_score(25).unwrap();

        assert_eq!(db.load_high_score(), 25);
    }
}
