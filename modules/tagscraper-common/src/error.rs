use thiserror::Error;

use crate::types::{Source, Stage};

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("input file empty")]
    InputEmpty,

    #[error("invalid source: {0}")]
    UnknownSource(String),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid input: {blob}: {reason}")]
    CorruptData { blob: String, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A key's pipeline failed. The orchestrator surfaces the first of these.
    #[error("{channel}-{key} failed while {stage}: {cause}")]
    Aggregate {
        channel: Source,
        key: String,
        stage: Stage,
        cause: Box<ScrapeError>,
    },
}

impl ScrapeError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        ScrapeError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// The underlying failure, unwrapping any pipeline context.
    pub fn root_cause(&self) -> &ScrapeError {
        match self {
            ScrapeError::Aggregate { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
