//! Turns free-typed search text into the artifacts each engine matches with.
//!
//! The index engine consumes SQL `LIKE` patterns, the filesystem engine a
//! [`FileMatcher`]. Both start from [`validate_query`], so an empty query is
//! rejected before any backend is touched.

use crate::error::AppError;
use crate::models::search::SearchMode;
use crate::services::date_query;

/// How the backend compares text in `LIKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMatching {
    /// `LIKE` already ignores case; one pattern is enough.
    Native,
    /// `LIKE` is case-sensitive; emulate with case variants of the phrase.
    Variants,
}

impl CaseMatching {
    pub fn from_capability(case_insensitive_like: bool) -> Self {
        if case_insensitive_like {
            Self::Native
        } else {
            Self::Variants
        }
    }
}

pub fn validate_query(raw: &str) -> Result<&str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidQuery(
            "Please enter a name or date to search.".to_string(),
        ));
    }
    Ok(trimmed)
}

pub fn like_pattern(text: &str) -> String {
    format!("%{text}%")
}

pub fn name_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest
/// ("dela cruz-o'neil" -> "Dela Cruz-O'Neil").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// As typed, lowercase, uppercase, title case.
pub fn case_variants(query: &str) -> [String; 4] {
    [
        query.to_string(),
        query.to_lowercase(),
        query.to_uppercase(),
        title_case(query),
    ]
}

/// `LIKE` patterns for the index engine. `query` must already be validated.
pub fn index_patterns(query: &str, mode: SearchMode, case: CaseMatching) -> Vec<String> {
    match mode {
        SearchMode::Name => match case {
            CaseMatching::Native => vec![like_pattern(query)],
            CaseMatching::Variants => case_variants(query)
                .iter()
                .map(|v| like_pattern(v))
                .collect(),
        },
        SearchMode::RegNo => vec![like_pattern(query)],
        SearchMode::Date => date_query::parse_date_query(query).patterns,
    }
}

/// Filename predicate for the filesystem engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMatcher {
    /// Every term must appear somewhere in the name, in any order.
    AllTerms(Vec<String>),
    /// The whole query must appear as one substring.
    Contains(String),
}

impl FileMatcher {
    pub fn for_query(query: &str, mode: SearchMode) -> Self {
        match mode {
            SearchMode::Name | SearchMode::RegNo => Self::AllTerms(name_terms(query)),
            SearchMode::Date => Self::Contains(query.to_lowercase()),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        let file_name = file_name.to_lowercase();
        match self {
            Self::AllTerms(terms) => terms.iter().all(|term| file_name.contains(term.as_str())),
            Self::Contains(needle) => file_name.contains(needle.as_str()),
        }
    }
}
