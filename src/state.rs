use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::AppConfig;
use crate::data::sqlite_index::SqliteIndex;
use crate::error::AppError;
use crate::services::file_store::LocalFileStore;
use crate::services::search_service::SearchCoordinator;

pub type RegistrySearch = SearchCoordinator<SqliteIndex, LocalFileStore>;

pub struct AppState {
    pub config: AppConfig,
    pub search: RegistrySearch,
    search_generation: AtomicU64,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let index = SqliteIndex::open(&config.database_path, config.case_sensitive_like)?;
        let search = SearchCoordinator::new(index, LocalFileStore, config.roots.clone());
        Ok(Self {
            config,
            search,
            search_generation: AtomicU64::new(0),
        })
    }

    pub fn index(&self) -> &SqliteIndex {
        self.search.index().backend()
    }

    /// Claims the next search slot. Any earlier slot stops being current.
    pub fn begin_search(&self) -> u64 {
        self.search_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current_search(&self, ticket: u64) -> bool {
        self.search_generation.load(Ordering::SeqCst) == ticket
    }
}
