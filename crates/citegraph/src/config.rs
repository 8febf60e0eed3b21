//! Analysis configuration.
//!
//! All tunables for one analysis run live in an explicit, immutable
//! [`AnalysisConfig`] value that is validated once and then passed into each
//! component. Nothing in the engine reads process-wide state.
//!
//! The configuration can be loaded from a YAML file:
//!
//! ```yaml
//! similarity_threshold: 0.35
//! weights:
//!   title: 0.5
//!   authors: 0.3
//!   keywords: 0.2
//! epsilon_weight_floor: 0.000001
//! direction: year-then-id
//! max_outgoing_per_node: 5
//! parallel: true
//! query:
//!   source: 0
//!   target: 12
//! ```

use crate::domain::RecordId;
use crate::error::{Error, Result};
use crate::inference::DirectionRule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum combined similarity for an inferred edge.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.35;

/// Default lower bound applied to inferred edge weights.
pub const DEFAULT_EPSILON_WEIGHT_FLOOR: f64 = 1e-6;

/// Allowed deviation of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Relative importance of each similarity component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    /// Weight of the title-token Jaccard index.
    pub title: f64,
    /// Weight of the author-set Jaccard index.
    pub authors: f64,
    /// Weight of the keyword-set Jaccard index.
    pub keywords: f64,
}

impl SimilarityWeights {
    /// Checks that each weight is in `[0, 1]` and that they sum to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("title", self.title),
            ("authors", self.authors),
            ("keywords", self.keywords),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration(format!(
                    "weight '{name}' must be within [0, 1], got {value}"
                )));
            }
        }

        let sum = self.title + self.authors + self.keywords;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidConfiguration(format!(
                "similarity weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            title: 0.5,
            authors: 0.3,
            keywords: 0.2,
        }
    }
}

/// Source and target of the shortest-path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    /// Record the path starts from.
    pub source: RecordId,
    /// Record the path should reach.
    pub target: RecordId,
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum combined similarity `τ ∈ (0, 1]` required to infer an edge.
    pub similarity_threshold: f64,

    /// Component weights for the similarity score.
    pub weights: SimilarityWeights,

    /// Lower bound `ε ∈ (0, 1]` for inferred edge weights.
    pub epsilon_weight_floor: f64,

    /// Rule deciding which record of a pair may cite the other.
    pub direction: DirectionRule,

    /// Keep only this many strongest inferred edges per citing record.
    pub max_outgoing_per_node: Option<usize>,

    /// Run the pairwise similarity sweep on the rayon thread pool.
    pub parallel: bool,

    /// Optional shortest-path query.
    pub query: Option<PathQuery>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            weights: SimilarityWeights::default(),
            epsilon_weight_floor: DEFAULT_EPSILON_WEIGHT_FLOOR,
            direction: DirectionRule::default(),
            max_outgoing_per_node: None,
            parallel: true,
            query: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Missing keys take their default values. The loaded value is validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::InvalidConfiguration`] if it does not parse or validate.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded analysis configuration");
        Ok(config)
    }

    /// Parses and validates configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] on parse or validation failure.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidConfiguration(format!("YAML error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::InvalidConfiguration(format!("YAML error: {e}")))
    }

    /// Checks every option against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let tau = self.similarity_threshold;
        if !tau.is_finite() || tau <= 0.0 || tau > 1.0 {
            return Err(Error::InvalidConfiguration(format!(
                "similarity threshold must be within (0, 1], got {tau}"
            )));
        }

        self.weights.validate()?;

        let eps = self.epsilon_weight_floor;
        if !eps.is_finite() || eps <= 0.0 || eps > 1.0 {
            return Err(Error::InvalidConfiguration(format!(
                "epsilon weight floor must be within (0, 1], got {eps}"
            )));
        }

        if self.max_outgoing_per_node == Some(0) {
            return Err(Error::InvalidConfiguration(
                "max outgoing edges per node must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
