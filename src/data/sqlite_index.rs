use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::data::{migrations, register_path_function, repository};
use crate::error::AppError;
use crate::services::index_search::{BackendCapabilities, IndexBackend, SqlQuery};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed index. Holds only the database location; every call opens
/// its own connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteIndex {
    db_path: PathBuf,
    case_sensitive_like: bool,
    capabilities: BackendCapabilities,
}

impl SqliteIndex {
    /// Creates the database if needed, runs migrations and probes how `LIKE`
    /// treats case on this configuration.
    pub fn open(db_path: &Path, case_sensitive_like: bool) -> Result<Self, AppError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut index = Self {
            db_path: db_path.to_path_buf(),
            case_sensitive_like,
            capabilities: BackendCapabilities {
                case_insensitive_like: false,
            },
        };

        let conn = index.connect()?;
        migrations::run_migrations(&conn)?;
        index.capabilities = probe_capabilities(&conn)?;
        info!(
            db = %index.db_path.display(),
            case_insensitive_like = index.capabilities.case_insensitive_like,
            "index database ready"
        );

        Ok(index)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn connect(&self) -> Result<Connection, AppError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_path_function(&conn)?;
        if self.case_sensitive_like {
            conn.execute_batch("PRAGMA case_sensitive_like = ON;")?;
        }
        Ok(conn)
    }
}

/// `LIKE` only counts as case-insensitive if it folds non-ASCII letters too;
/// stock SQLite folds ASCII only, so names like PEÑA need the case variants.
fn probe_capabilities(conn: &Connection) -> Result<BackendCapabilities, AppError> {
    let folds_case: bool = conn.query_row(
        "SELECT 'a' LIKE 'A' AND 'ñ' LIKE 'Ñ'",
        [],
        |row| row.get(0),
    )?;
    Ok(BackendCapabilities {
        case_insensitive_like: folds_case,
    })
}

impl IndexBackend for SqliteIndex {
    fn capabilities(&self) -> BackendCapabilities {
        self.capabilities
    }

    fn query_file_paths(&self, query: &SqlQuery) -> Result<Vec<String>, AppError> {
        let conn = self.connect()?;
        let paths = repository::query_file_paths(&conn, &query.sql, &query.params)?;
        debug!(rows = paths.len(), "index query finished");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{IndexRow, RecordType};

    #[test]
    fn open_creates_database_and_probes_like() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.db");

        let index = SqliteIndex::open(&path, false).unwrap();
        assert!(path.exists());
        // bundled SQLite folds ASCII only
        assert!(!index.capabilities().case_insensitive_like);
    }

    #[test]
    fn case_sensitive_like_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let index = SqliteIndex::open(&dir.path().join("registry.db"), true).unwrap();
        assert!(!index.capabilities().case_insensitive_like);
    }

    #[test]
    fn connections_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let index = SqliteIndex::open(&dir.path().join("registry.db"), false).unwrap();

        {
            let conn = index.connect().unwrap();
            let row = IndexRow {
                record_type: RecordType::Death,
                file_path: "D:\\MCR\\DEATH\\2001\\x.pdf".to_string(),
                name: "X".to_string(),
                spouse_name: None,
                record_date: None,
                reg_no: None,
                page_no: None,
                book_no: None,
                date_of_reg: None,
                late_registration: false,
                details: Default::default(),
            };
            repository::upsert_record(&conn, &row).unwrap();
        }

        let paths = index
            .query_file_paths(&SqlQuery {
                sql: "SELECT file_path FROM death_index WHERE normalize_path(file_path) = ?1"
                    .to_string(),
                params: vec!["D:/MCR/DEATH/2001/x.pdf".to_string()],
            })
            .unwrap();
        assert_eq!(paths, vec!["D:/MCR/DEATH/2001/x.pdf"]);
    }

    #[test]
    fn malformed_sql_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = SqliteIndex::open(&dir.path().join("registry.db"), false).unwrap();

        let result = index.query_file_paths(&SqlQuery {
            sql: "SELEC file_path".to_string(),
            params: vec![],
        });
        assert!(result.is_err());
    }
}
