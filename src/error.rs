use std::path::PathBuf;

use serde::Serialize;

use crate::models::record::RecordType;
use crate::models::search::SearchMode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Location not found: {}", .0.display())]
    LocationNotFound(PathBuf),

    #[error("Search backend unavailable ({record_type} {mode} search for {query:?}): {source}")]
    BackendUnavailable {
        record_type: RecordType,
        mode: SearchMode,
        query: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    General(String),
}

impl AppError {
    /// Stable tag for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Io(_) => "io",
            Self::Serde(_) => "serialization",
            Self::Walk(_) => "walk",
            Self::InvalidQuery(_) => "invalid_query",
            Self::LocationNotFound(_) => "location_not_found",
            Self::BackendUnavailable { .. } => "backend_unavailable",
            Self::Config(_) => "config",
            Self::General(_) => "general",
        }
    }

    pub fn backend(
        record_type: RecordType,
        mode: SearchMode,
        query: &str,
        source: AppError,
    ) -> Self {
        Self::BackendUnavailable {
            record_type,
            mode,
            query: query.to_string(),
            source: Box::new(source),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
