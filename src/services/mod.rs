pub mod date_query;
pub mod file_store;
pub mod fs_search;
pub mod index_search;
pub mod query_normalizer;
pub mod search_service;
