use serde::{Deserialize, Serialize};

use crate::error::{Result, SuggestError};
use crate::suggest::{Metric, MetricKind};

/// Parameters of one similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// The string to match.
    pub query: String,
    /// Maximum number of results.
    pub top_k: usize,
    /// Minimum similarity of a result, in `(0, 1]`.
    pub similarity: f64,
    /// Similarity measure, Jaccard by default.
    #[serde(default)]
    pub metric: MetricKind,
}

impl SearchConfig {
    pub fn new<S: Into<String>>(query: S, top_k: usize, similarity: f64) -> Result<Self> {
        let config = SearchConfig {
            query: query.into(),
            top_k,
            similarity,
            metric: MetricKind::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Score with `metric` instead of Jaccard.
    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.metric = metric;
        self
    }

    pub fn metric(&self) -> &'static dyn Metric {
        self.metric.metric()
    }

    /// Check that the similarity lies in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.similarity > 0.0 && self.similarity <= 1.0) {
            return Err(SuggestError::config(format!(
                "similarity should be in (0, 1], got {}",
                self.similarity
            )));
        }
        Ok(())
    }
}
