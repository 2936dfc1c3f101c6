use tracing::debug;

use crate::error::AppError;
use crate::models::record::RecordType;
use crate::models::search::{MatchSource, SearchHit, SearchMode};
use crate::scope_path;
use crate::services::query_normalizer::{self, CaseMatching};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    pub case_insensitive_like: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Read side of the metadata tables.
pub trait IndexBackend {
    fn capabilities(&self) -> BackendCapabilities;

    /// Runs a query whose first column is `file_path`, in the order the
    /// query asks for.
    fn query_file_paths(&self, query: &SqlQuery) -> Result<Vec<String>, AppError>;
}

impl<B: IndexBackend + ?Sized> IndexBackend for &B {
    fn capabilities(&self) -> BackendCapabilities {
        (**self).capabilities()
    }

    fn query_file_paths(&self, query: &SqlQuery) -> Result<Vec<String>, AppError> {
        (**self).query_file_paths(query)
    }
}

/// Builds `SELECT file_path FROM <table> WHERE (...) ORDER BY <date> DESC`,
/// OR-ing every pattern against every column the mode targets.
pub fn build_query(record_type: RecordType, mode: SearchMode, patterns: &[String]) -> SqlQuery {
    let schema = record_type.schema();
    let date_text = format!("CAST({} AS TEXT)", schema.date_column);

    let mut clauses = Vec::new();
    for (i, _) in patterns.iter().enumerate() {
        let param = i + 1;
        match mode {
            SearchMode::Name => {
                for column in schema.name_columns {
                    clauses.push(format!("LOWER({column}) LIKE LOWER(?{param})"));
                }
            }
            SearchMode::Date => clauses.push(format!("{date_text} LIKE ?{param}")),
            SearchMode::RegNo => clauses.push(format!("{} LIKE ?{param}", schema.reg_no_column)),
        }
    }

    SqlQuery {
        sql: format!(
            "SELECT file_path FROM {} WHERE ({}) ORDER BY {} DESC",
            schema.table,
            clauses.join(" OR "),
            schema.date_column
        ),
        params: patterns.to_vec(),
    }
}

pub struct IndexSearchEngine<B> {
    backend: B,
}

impl<B: IndexBackend> IndexSearchEngine<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn case_matching(&self) -> CaseMatching {
        CaseMatching::from_capability(self.backend.capabilities().case_insensitive_like)
    }

    /// `query` must already be validated. Most recent record date first.
    pub fn search(
        &self,
        record_type: RecordType,
        mode: SearchMode,
        query: &str,
    ) -> Result<Vec<SearchHit>, AppError> {
        let patterns = query_normalizer::index_patterns(query, mode, self.case_matching());
        let sql = build_query(record_type, mode, &patterns);
        debug!(sql = %sql.sql, params = ?sql.params, "index search");

        let paths = self
            .backend
            .query_file_paths(&sql)
            .map_err(|e| AppError::backend(record_type, mode, query, e))?;

        Ok(paths
            .into_iter()
            .map(|path| {
                let file_path = scope_path::normalize(&path);
                SearchHit {
                    file_name: scope_path::file_name(&file_path),
                    file_path,
                    match_source: MatchSource::Index,
                }
            })
            .collect())
    }
}
