use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::search::{SearchHit, SearchOutcome, SearchRequest};
use crate::state::AppState;

/// Where search outcomes are presented. The core never renders anything
/// itself.
pub trait ResultSink {
    fn show_results(&mut self, items: &[SearchHit]);
    fn show_status(&mut self, message: &str);
    fn show_empty(&mut self);
    fn show_error(&mut self, message: &str);
}

pub fn user_message(err: &AppError) -> String {
    match err {
        AppError::InvalidQuery(reason) => reason.clone(),
        AppError::LocationNotFound(_) => "Cannot find location. Please check the year.".to_string(),
        AppError::BackendUnavailable { source, .. } => {
            format!("An error occurred during search: {source}")
        }
        other => format!("An error occurred during search: {other}"),
    }
}

fn log_started(request: &SearchRequest) {
    info!(
        record_type = %request.record_type,
        mode = %request.mode,
        query = %request.text,
        year = ?request.year,
        source = ?request.source,
        "search started"
    );
}

fn present(
    request: &SearchRequest,
    result: &Result<SearchOutcome, AppError>,
    sink: &mut dyn ResultSink,
) {
    match result {
        Ok(SearchOutcome::Found(hits)) => {
            info!(
                record_type = %request.record_type,
                mode = %request.mode,
                count = hits.len(),
                "search completed"
            );
            sink.show_results(hits);
            sink.show_status(&format!("Found {} files.", hits.len()));
        }
        Ok(SearchOutcome::Empty) => {
            info!(
                record_type = %request.record_type,
                mode = %request.mode,
                query = %request.text,
                "search found nothing"
            );
            sink.show_empty();
            sink.show_status("No PDF files found.");
        }
        Err(err) => {
            warn!(
                record_type = %request.record_type,
                mode = %request.mode,
                query = %request.text,
                kind = err.kind(),
                error = %err,
                "search failed"
            );
            sink.show_error(&user_message(err));
        }
    }
}

/// Runs one search on the calling thread and hands the outcome to `sink`.
pub fn run_search(
    state: &AppState,
    request: &SearchRequest,
    sink: &mut dyn ResultSink,
) -> Result<SearchOutcome, AppError> {
    log_started(request);
    let result = state.search.search(request);
    present(request, &result, sink);
    result
}

/// Delivers a finished search unless a newer one has started since `ticket`
/// was issued. Returns `None` for a superseded search.
pub fn finish_search<S: ResultSink>(
    state: &AppState,
    ticket: u64,
    request: &SearchRequest,
    result: Result<SearchOutcome, AppError>,
    sink: &Mutex<S>,
) -> Option<Result<SearchOutcome, AppError>> {
    let mut sink = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if !state.is_current_search(ticket) {
        debug!(ticket, query = %request.text, "dropping superseded search");
        return None;
    }
    present(request, &result, &mut *sink);
    Some(result)
}

/// Runs the search on the blocking pool so the caller stays responsive.
/// Starting another search makes this one's outcome stale; stale outcomes
/// never reach `sink`.
pub fn spawn_search<S>(
    state: Arc<AppState>,
    request: SearchRequest,
    sink: Arc<Mutex<S>>,
) -> JoinHandle<Option<Result<SearchOutcome, AppError>>>
where
    S: ResultSink + Send + 'static,
{
    let ticket = state.begin_search();
    tokio::task::spawn_blocking(move || {
        log_started(&request);
        let result = state.search.search(&request);
        finish_search(&state, ticket, &request, result, &sink)
    })
}
