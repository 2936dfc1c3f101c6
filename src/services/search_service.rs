use tracing::debug;

use crate::config::RecordRoots;
use crate::error::AppError;
use crate::models::search::{SearchOutcome, SearchRequest, SearchSource};
use crate::scope_path;
use crate::services::file_store::FileStore;
use crate::services::fs_search::FilesystemSearchEngine;
use crate::services::index_search::{IndexBackend, IndexSearchEngine};
use crate::services::query_normalizer;

/// Single entry point for both engines. Holds no per-search state.
pub struct SearchCoordinator<B, F> {
    index: IndexSearchEngine<B>,
    files: FilesystemSearchEngine<F>,
    roots: RecordRoots,
}

impl<B: IndexBackend, F: FileStore> SearchCoordinator<B, F> {
    pub fn new(backend: B, store: F, roots: RecordRoots) -> Self {
        Self {
            index: IndexSearchEngine::new(backend),
            files: FilesystemSearchEngine::new(store),
            roots,
        }
    }

    pub fn index(&self) -> &IndexSearchEngine<B> {
        &self.index
    }

    pub fn files(&self) -> &FilesystemSearchEngine<F> {
        &self.files
    }

    pub fn roots(&self) -> &RecordRoots {
        &self.roots
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, AppError> {
        let query = query_normalizer::validate_query(&request.text)?;
        let year = validate_year(request.year.as_deref())?;

        if request.source == SearchSource::Filesystem && year.is_none() {
            return Err(AppError::InvalidQuery(
                "Please enter a registration year.".to_string(),
            ));
        }

        let root = self.roots.root_for(request.record_type);
        let hits = match (request.source, year) {
            (SearchSource::Filesystem, Some(year)) => {
                self.files.search(root, year, request.mode, query)?
            }
            (SearchSource::Auto, Some(year)) => {
                let hits = self.index.search(request.record_type, request.mode, query)?;
                if hits.is_empty() {
                    debug!(year, "nothing tagged yet, walking year folder");
                    self.files.search(root, year, request.mode, query)?
                } else {
                    hits
                }
            }
            _ => self.index.search(request.record_type, request.mode, query)?,
        };

        Ok(SearchOutcome::from_hits(hits))
    }
}

/// Trims the year; blank means absent. Anything that is not a single folder
/// name is rejected.
pub fn validate_year(year: Option<&str>) -> Result<Option<&str>, AppError> {
    let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) else {
        return Ok(None);
    };
    if !scope_path::is_plain_segment(year) {
        return Err(AppError::InvalidQuery(format!(
            "Registration year is not a folder name: {year}"
        )));
    }
    Ok(Some(year))
}
