use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

// --- Records ---

/// One scraped thread: a title and the URL it links to.
///
/// Identity is the `reference` alone. Persisted as `{"title": .., "ref": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl Record {
    pub fn new(title: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reference: reference.into(),
        }
    }
}

/// Ordered records for one (source, key) pair.
pub type RecordSet = Vec<Record>;

// --- Sources ---

/// The closed set of sites a request may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    StackOverflow,
    Quora,
    Reddit,
}

impl Source {
    /// Channel order used by the orchestrator.
    pub const ALL: [Source; 3] = [Source::StackOverflow, Source::Quora, Source::Reddit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::StackOverflow => "stackoverflow",
            Source::Quora => "quora",
            Source::Reddit => "reddit",
        }
    }

    /// Name of the blob holding the records for `key`.
    pub fn blob_name(&self, key: &str) -> String {
        format!("{}-{key}", self.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stackoverflow" => Ok(Source::StackOverflow),
            "quora" => Ok(Source::Quora),
            "reddit" => Ok(Source::Reddit),
            other => Err(ScrapeError::UnknownSource(other.to_string())),
        }
    }
}

// --- Pipeline stages ---

/// Steps of a single key's pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reading,
    Scraping,
    Merging,
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Reading => "reading",
            Stage::Scraping => "scraping",
            Stage::Merging => "merging",
            Stage::Writing => "writing",
        };
        f.write_str(s)
    }
}

// --- Requests ---

/// Source name to the keys to scrape for it, exactly as submitted.
///
/// Names are kept as raw strings, in submission order, so the request can be
/// echoed back unchanged, including names outside the known source set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeRequest {
    channels: IndexMap<String, Vec<String>>,
}

impl ScrapeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel<I, K>(mut self, source: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.channels
            .insert(source.to_string(), keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Keys requested for a known source, if the request names it.
    pub fn keys_for(&self, source: Source) -> Option<&[String]> {
        self.channels.get(source.as_str()).map(Vec::as_slice)
    }

    /// Source names in the request that are not part of the known set.
    pub fn unknown_sources(&self) -> impl Iterator<Item = &str> {
        self.channels
            .keys()
            .map(String::as_str)
            .filter(|name| name.parse::<Source>().is_err())
    }

    /// Parse an input document. Blank input and JSON `null` are the absent request.
    pub fn from_json(input: &str) -> Result<Option<Self>, serde_json::Error> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_reference_as_ref() {
        let json = serde_json::to_value(Record::new("t1", "u1")).unwrap();
        assert_eq!(json, serde_json::json!({"title": "t1", "ref": "u1"}));
    }

    #[test]
    fn source_round_trips_through_its_name() {
        for source in Source::ALL {
            assert_eq!(source.as_str().parse::<Source>().unwrap(), source);
        }
    }

    #[test]
    fn unknown_source_name_is_rejected() {
        let err = "twitter".parse::<Source>().unwrap_err();
        assert_eq!(err, ScrapeError::UnknownSource("twitter".into()));
    }

    #[test]
    fn blob_name_joins_source_and_key() {
        assert_eq!(Source::Reddit.blob_name("golang"), "reddit-golang");
        assert_eq!(Source::StackOverflow.blob_name("c++"), "stackoverflow-c++");
    }

    #[test]
    fn request_keeps_unknown_names_for_echo() {
        let request = ScrapeRequest::from_json(r#"{"twitter": ["x"], "reddit": ["rust"]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(request.keys_for(Source::Reddit), Some(&["rust".to_string()][..]));
        assert_eq!(request.keys_for(Source::Quora), None);
        assert_eq!(request.unknown_sources().collect::<Vec<_>>(), vec!["twitter"]);

        let echoed = serde_json::to_value(&request).unwrap();
        assert_eq!(echoed, serde_json::json!({"twitter": ["x"], "reddit": ["rust"]}));
    }

    #[test]
    fn echo_keeps_submission_order() {
        let input = r#"{"stackoverflow":["rust"],"reddit":["golang"],"quora":["C"]}"#;
        let request = ScrapeRequest::from_json(input).unwrap().unwrap();
        assert_eq!(serde_json::to_string(&request).unwrap(), input);
    }

    #[test]
    fn blank_and_null_input_are_absent() {
        assert_eq!(ScrapeRequest::from_json("").unwrap(), None);
        assert_eq!(ScrapeRequest::from_json("  \n").unwrap(), None);
        assert_eq!(ScrapeRequest::from_json("null").unwrap(), None);
        assert!(ScrapeRequest::from_json("{}").unwrap().unwrap().is_empty());
    }
}
