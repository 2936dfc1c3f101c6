use serde::{Deserialize, Serialize};

use crate::models::record::RecordType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Name,
    Date,
    RegNo,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Date => write!(f, "date"),
            Self::RegNo => write!(f, "reg_no"),
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "reg_no" | "regno" | "reg no." | "reg-no" => Ok(Self::RegNo),
            _ => Err(format!("unknown search mode: {s}")),
        }
    }
}

/// Which engine a request should run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// Tagged metadata tables (the verify workflow).
    #[default]
    Index,
    /// Year-folder walk over the raw file share (the legacy search workflow).
    Filesystem,
    /// Index first, then the year folder when nothing is tagged yet.
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub record_type: RecordType,
    pub mode: SearchMode,
    pub text: String,
    pub year: Option<String>,
    #[serde(default)]
    pub source: SearchSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Index,
    Filesystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Canonical (forward-slash) path of the document.
    pub file_path: String,
    pub file_name: String,
    pub match_source: MatchSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<SearchHit>),
    Empty,
}

impl SearchOutcome {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        if hits.is_empty() {
            Self::Empty
        } else {
            Self::Found(hits)
        }
    }

    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Found(hits) => hits,
            Self::Empty => &[],
        }
    }
}
