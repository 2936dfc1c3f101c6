pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod output;
pub(crate) mod scope_path;
pub mod services;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use commands::search_commands::ResultSink;
pub use config::AppConfig;
pub use error::AppError;
pub use models::record::{IndexRow, RecordType};
pub use models::search::{
    MatchSource, SearchHit, SearchMode, SearchOutcome, SearchRequest, SearchSource,
};
pub use state::AppState;

/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
