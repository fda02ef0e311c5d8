use crate::error::{Result, SearchError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
pub const RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_SHARD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hits kept after sorting.
    pub max_result_document_count: usize,
    /// Relevances closer than this are ranked by rating instead.
    pub relevance_epsilon: f64,
    /// Shards of the parallel relevance accumulator.
    pub shard_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_result_document_count: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_result_document_count == 0 {
            return Err(SearchError::InvalidConfig("max_result_document_count must be positive".into()));
        }
        if self.shard_count == 0 {
            return Err(SearchError::InvalidConfig("shard_count must be positive".into()));
        }
        if !self.relevance_epsilon.is_finite() || self.relevance_epsilon < 0.0 {
            return Err(SearchError::InvalidConfig("relevance_epsilon must be a non-negative number".into()));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open config {}", path.display()))?;
        let config: SearchConfig = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by TFIDF_MAX_RESULTS, TFIDF_RELEVANCE_EPSILON and TFIDF_SHARD_COUNT.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("TFIDF_MAX_RESULTS") {
            self.max_result_document_count = val.trim().parse().context("TFIDF_MAX_RESULTS")?;
        }
        if let Some(val) = lookup("TFIDF_RELEVANCE_EPSILON") {
            self.relevance_epsilon = val.trim().parse().context("TFIDF_RELEVANCE_EPSILON")?;
        }
        if let Some(val) = lookup("TFIDF_SHARD_COUNT") {
            self.shard_count = val.trim().parse().context("TFIDF_SHARD_COUNT")?;
        }
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_engine_constants() {
        let config = SearchConfig::default();
        assert_eq!(config.max_result_document_count, 5);
        assert_eq!(config.relevance_epsilon, 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_apply_and_validate() {
        let vars: HashMap<&str, &str> = [("TFIDF_SHARD_COUNT", "16"), ("TFIDF_MAX_RESULTS", " 10 ")].into();
        let config = SearchConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.max_result_document_count, 10);

        let bad: HashMap<&str, &str> = [("TFIDF_SHARD_COUNT", "0")].into();
        assert!(SearchConfig::default().with_overrides(|k| bad.get(k).map(|v| v.to_string())).is_err());
        let garbage: HashMap<&str, &str> = [("TFIDF_RELEVANCE_EPSILON", "tiny")].into();
        assert!(SearchConfig::default().with_overrides(|k| garbage.get(k).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn json_file_fills_missing_fields_with_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "shard_count": 2 }}"#).unwrap();
        let config = SearchConfig::from_json_file(f.path()).unwrap();
        assert_eq!(config.shard_count, 2);
        assert_eq!(config.max_result_document_count, 5);
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let config = SearchConfig { relevance_epsilon: -1.0, ..SearchConfig::default() };
        assert!(matches!(config.validate(), Err(SearchError::InvalidConfig(_))));
    }
}
