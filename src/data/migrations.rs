use rusqlite::Connection;

use crate::error::AppError;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS birth_index (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    date_of_birth TEXT,
    reg_no TEXT,
    page_no INTEGER,
    book_no INTEGER,
    date_of_reg TEXT,
    late_registration BOOLEAN DEFAULT 0,
    details TEXT,
    tagged_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_birth_date ON birth_index(date_of_birth DESC);
CREATE INDEX IF NOT EXISTS idx_birth_name ON birth_index(name);
CREATE INDEX IF NOT EXISTS idx_birth_reg_no ON birth_index(reg_no);

CREATE TABLE IF NOT EXISTS death_index (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    date_of_death TEXT,
    reg_no TEXT,
    page_no INTEGER,
    book_no INTEGER,
    date_of_reg TEXT,
    late_registration BOOLEAN DEFAULT 0,
    details TEXT,
    tagged_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_death_date ON death_index(date_of_death DESC);
CREATE INDEX IF NOT EXISTS idx_death_name ON death_index(name);
CREATE INDEX IF NOT EXISTS idx_death_reg_no ON death_index(reg_no);

CREATE TABLE IF NOT EXISTS marriage_index (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT UNIQUE NOT NULL,
    husband_name TEXT NOT NULL,
    wife_name TEXT,
    date_of_marriage TEXT,
    reg_no TEXT,
    page_no INTEGER,
    book_no INTEGER,
    date_of_reg TEXT,
    late_registration BOOLEAN DEFAULT 0,
    details TEXT,
    tagged_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_marriage_date ON marriage_index(date_of_marriage DESC);
CREATE INDEX IF NOT EXISTS idx_marriage_husband ON marriage_index(husband_name);
CREATE INDEX IF NOT EXISTS idx_marriage_wife ON marriage_index(wife_name);
CREATE INDEX IF NOT EXISTS idx_marriage_reg_no ON marriage_index(reg_no);
";

pub fn run_migrations(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch(SCHEMA_V1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"birth_index".to_string()));
        assert!(tables.contains(&"death_index".to_string()));
        assert!(tables.contains(&"marriage_index".to_string()));
    }

    #[test]
    fn test_migration_enables_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("test.db")).unwrap();
        run_migrations(&conn).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap(); // should not error
    }

    #[test]
    fn test_file_path_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO death_index (file_path, name) VALUES ('a/b.pdf', 'X')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO death_index (file_path, name) VALUES ('a/b.pdf', 'Y')",
            [],
        );
        assert!(dup.is_err());
    }
}
