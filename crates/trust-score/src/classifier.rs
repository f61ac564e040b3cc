//! Location context classification
//!
//! Decides whether an idle stop happened in traffic (waived) or at a
//! parking spot (charged). The keyword matcher is the default; a
//! model-backed service can be plugged in through [`AsyncTrafficClassifier`].

use async_trait::async_trait;

use crate::config::{ClassifierConfig, DEFAULT_TRAFFIC_KEYWORDS};
use crate::error::ScoringError;

/// Synchronous traffic classifier
pub trait TrafficClassifier: Send + Sync {
    /// Whether a vehicle idling at `location_context` is likely stuck in traffic
    fn is_traffic(&self, location_context: &str) -> bool;
}

impl<F> TrafficClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_traffic(&self, location_context: &str) -> bool {
        self(location_context)
    }
}

/// Classifier that may call out to a remote model
#[async_trait]
pub trait AsyncTrafficClassifier: Send + Sync {
    async fn classify(&self, location_context: &str) -> Result<bool, ScoringError>;
}

/// Case-insensitive keyword matcher
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Create a classifier from a keyword list. Blank keywords are dropped
    /// since they would match every location.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.keywords)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRAFFIC_KEYWORDS)
    }
}

impl TrafficClassifier for KeywordClassifier {
    fn is_traffic(&self, location_context: &str) -> bool {
        let context = location_context.to_lowercase();
        self.keywords.iter().any(|k| context.contains(k.as_str()))
    }
}

#[async_trait]
impl AsyncTrafficClassifier for KeywordClassifier {
    async fn classify(&self, location_context: &str) -> Result<bool, ScoringError> {
        Ok(self.is_traffic(location_context))
    }
}
