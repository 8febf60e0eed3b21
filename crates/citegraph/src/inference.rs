//! Edge inference: explicit citations plus similarity-derived edges.
//!
//! For every record the engine emits either its explicit citations (weight
//! 1.0) or, when it has none, an inferred edge to every other record that the
//! [`DirectionPolicy`] allows it to cite and whose similarity reaches the
//! threshold. The O(n²) sweep maps over source records (in parallel with
//! rayon when enabled) and a sequential merge deduplicates the results.

use crate::config::AnalysisConfig;
use crate::domain::{Record, RecordId, RecordSet};
use crate::error::{AnalysisWarning, Result};
use crate::graph::Edge;
use crate::similarity::SimilarityEstimator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Decides which record of a pair may cite the other.
pub trait DirectionPolicy: Send + Sync {
    /// Returns `true` if an edge `citing -> cited` is allowed.
    fn may_cite(&self, citing: &Record, cited: &Record) -> bool;
}

/// Built-in direction policies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionRule {
    /// A record never cites one published strictly later. When either year
    /// is unknown, the record with the higher id is treated as the later one.
    #[default]
    YearThenId,
    /// Only higher ids cite lower ids.
    IdOrder,
    /// Any record may cite any other.
    Unrestricted,
}

impl DirectionRule {
    /// Configuration name of the rule.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::YearThenId => "year-then-id",
            Self::IdOrder => "id-order",
            Self::Unrestricted => "unrestricted",
        }
    }
}

impl std::fmt::Display for DirectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DirectionRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year-then-id" => Ok(Self::YearThenId),
            "id-order" => Ok(Self::IdOrder),
            "unrestricted" => Ok(Self::Unrestricted),
            other => Err(format!(
                "unknown direction rule '{other}' (expected year-then-id, id-order or unrestricted)"
            )),
        }
    }
}

impl DirectionPolicy for DirectionRule {
    fn may_cite(&self, citing: &Record, cited: &Record) -> bool {
        match self {
            Self::YearThenId => match (citing.year, cited.year) {
                (Some(citing_year), Some(cited_year)) => cited_year <= citing_year,
                _ => citing.id > cited.id,
            },
            Self::IdOrder => citing.id > cited.id,
            Self::Unrestricted => true,
        }
    }
}

/// Edges and warnings produced by one inference run.
#[derive(Debug, Clone, Default)]
pub struct InferenceOutcome {
    /// Deduplicated edges in ascending `(from, to)` order.
    pub edges: Vec<Edge>,
    /// Recovered anomalies, in source-record order.
    pub warnings: Vec<AnalysisWarning>,
}

impl InferenceOutcome {
    /// Number of explicit edges.
    #[must_use]
    pub fn explicit_count(&self) -> usize {
        self.edges.iter().filter(|e| e.origin.is_explicit()).count()
    }

    /// Number of inferred edges.
    #[must_use]
    pub fn inferred_count(&self) -> usize {
        self.edges.len() - self.explicit_count()
    }
}

/// Candidate edges for a single citing record.
#[derive(Debug, Default)]
struct SourceBatch {
    edges: Vec<Edge>,
    warnings: Vec<AnalysisWarning>,
}

/// Builds the edge set of a citation graph from a record set.
#[derive(Debug, Clone)]
pub struct EdgeInference<P = DirectionRule> {
    estimator: SimilarityEstimator,
    threshold: f64,
    floor: f64,
    max_outgoing: Option<usize>,
    parallel: bool,
    policy: P,
}

impl EdgeInference<DirectionRule> {
    /// Creates an engine using the configured direction rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// does not validate.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::with_policy(config, config.direction)
    }
}

impl<P: DirectionPolicy> EdgeInference<P> {
    /// Creates an engine with a custom direction policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// does not validate.
    pub fn with_policy(config: &AnalysisConfig, policy: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator: SimilarityEstimator::new(config.weights),
            threshold: config.similarity_threshold,
            floor: config.epsilon_weight_floor,
            max_outgoing: config.max_outgoing_per_node,
            parallel: config.parallel,
            policy,
        })
    }

    /// Runs the sweep over every record.
    #[must_use]
    pub fn infer(&self, records: &RecordSet) -> InferenceOutcome {
        tracing::debug!(
            records = records.len(),
            threshold = self.threshold,
            parallel = self.parallel,
            "Starting edge inference"
        );

        let batches: Vec<SourceBatch> = if self.parallel {
            records
                .as_slice()
                .par_iter()
                .map(|record| self.edges_from(record, records))
                .collect()
        } else {
            records
                .iter()
                .map(|record| self.edges_from(record, records))
                .collect()
        };

        let outcome = merge(batches);
        for warning in &outcome.warnings {
            tracing::warn!(kind = warning.kind(), "{warning}");
        }
        tracing::info!(
            explicit = outcome.explicit_count(),
            inferred = outcome.inferred_count(),
            warnings = outcome.warnings.len(),
            "Edge inference complete"
        );
        outcome
    }

    fn edges_from(&self, record: &Record, records: &RecordSet) -> SourceBatch {
        match &record.explicit_citations {
            Some(targets) => explicit_edges(record.id, targets, records),
            None => SourceBatch {
                edges: self.inferred_edges(record, records),
                warnings: Vec::new(),
            },
        }
    }

    fn inferred_edges(&self, record: &Record, records: &RecordSet) -> Vec<Edge> {
        let mut candidates: Vec<(RecordId, f64)> = records
            .iter()
            .filter(|other| other.id != record.id && self.policy.may_cite(record, other))
            .filter_map(|other| {
                let score = self.estimator.score(record, other);
                (score >= self.threshold).then_some((other.id, score))
            })
            .collect();

        if let Some(limit) = self.max_outgoing {
            candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            candidates.truncate(limit);
        }

        candidates
            .into_iter()
            .map(|(to, score)| Edge::inferred(record.id, to, score, self.floor))
            .collect()
    }
}

/// Infers the edge set for `records` under `config`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidConfiguration`] before doing any work if
/// the configuration does not validate.
pub fn infer_edges(records: &RecordSet, config: &AnalysisConfig) -> Result<InferenceOutcome> {
    Ok(EdgeInference::from_config(config)?.infer(records))
}

fn explicit_edges(from: RecordId, targets: &[i64], records: &RecordSet) -> SourceBatch {
    let mut batch = SourceBatch::default();
    let mut seen = BTreeSet::new();

    for &raw in targets {
        match records.resolve(raw) {
            None => batch
                .warnings
                .push(AnalysisWarning::DanglingCitation { from, target: raw }),
            Some(to) if to == from => batch
                .warnings
                .push(AnalysisWarning::SelfCitation { record: from }),
            Some(to) if !seen.insert(to) => batch
                .warnings
                .push(AnalysisWarning::DuplicateCitation { from, to }),
            Some(to) => batch.edges.push(Edge::explicit(from, to)),
        }
    }
    batch
}

fn merge(batches: Vec<SourceBatch>) -> InferenceOutcome {
    let mut unique: BTreeMap<(RecordId, RecordId), Edge> = BTreeMap::new();
    let mut warnings = Vec::new();

    for batch in batches {
        warnings.extend(batch.warnings);
        for edge in batch.edges {
            unique
                .entry((edge.from, edge.to))
                .and_modify(|kept| {
                    if edge.supersedes(kept) {
                        *kept = edge;
                    }
                })
                .or_insert(edge);
        }
    }

    InferenceOutcome {
        edges: unique.into_values().collect(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimilarityWeights;
    use crate::graph::EdgeOrigin;
    use rstest::{fixture, rstest};

    fn title_only() -> AnalysisConfig {
        AnalysisConfig {
            similarity_threshold: 0.5,
            weights: SimilarityWeights {
                title: 1.0,
                authors: 0.0,
                keywords: 0.0,
            },
            ..AnalysisConfig::default()
        }
    }

    fn pairs(outcome: &InferenceOutcome) -> Vec<(usize, usize)> {
        outcome.edges.iter().map(|e| (e.from.0, e.to.0)).collect()
    }

    #[fixture]
    fn same_title_records() -> RecordSet {
        RecordSet::new(vec![
            Record::new(0, "citation graph analysis").with_year(Some(2018)),
            Record::new(1, "citation graph analysis").with_year(Some(2020)),
            Record::new(2, "citation graph analysis"),
        ])
        .unwrap()
    }

    #[rstest]
    fn year_then_id_never_cites_later_work(same_title_records: RecordSet) {
        let outcome = infer_edges(&same_title_records, &title_only()).unwrap();
        // 1 (2020) may cite 0 (2018); 2 has no year so id order decides.
        assert_eq!(pairs(&outcome), vec![(1, 0), (2, 0), (2, 1)]);
        assert!(outcome.warnings.is_empty());
    }

    #[rstest]
    #[case::id_order(DirectionRule::IdOrder, vec![(1, 0), (2, 0), (2, 1)])]
    #[case::unrestricted(
        DirectionRule::Unrestricted,
        vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]
    )]
    fn direction_rule_controls_orientation(
        same_title_records: RecordSet,
        #[case] direction: DirectionRule,
        #[case] expected: Vec<(usize, usize)>,
    ) {
        let config = AnalysisConfig {
            direction,
            ..title_only()
        };
        let outcome = infer_edges(&same_title_records, &config).unwrap();
        assert_eq!(pairs(&outcome), expected);
    }

    #[test]
    fn equal_years_allow_both_directions() {
        let records = RecordSet::new(vec![
            Record::new(0, "same words here").with_year(Some(2019)),
            Record::new(1, "same words here").with_year(Some(2019)),
        ])
        .unwrap();
        let outcome = infer_edges(&records, &title_only()).unwrap();
        assert_eq!(pairs(&outcome), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn explicit_citations_replace_inference_for_their_record() {
        let records = RecordSet::new(vec![
            Record::new(0, "shared title words"),
            Record::new(1, "shared title words").with_citations([]),
            Record::new(2, "unrelated").with_citations([0]),
        ])
        .unwrap();
        let outcome = infer_edges(&records, &title_only()).unwrap();

        // Record 1 has an empty explicit list, so it emits nothing; record 0
        // has a lower id and cannot cite 1 under the default rule.
        assert_eq!(pairs(&outcome), vec![(2, 0)]);
        let edge = outcome.edges[0];
        assert_eq!(edge.origin, EdgeOrigin::Explicit);
        assert!((edge.weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_explicit_targets_become_warnings() {
        let records = RecordSet::new(vec![
            Record::new(0, "a").with_citations([1, 0, 7, 1, -2]),
            Record::new(1, "b"),
        ])
        .unwrap();
        let outcome = infer_edges(&records, &title_only()).unwrap();

        assert_eq!(pairs(&outcome), vec![(0, 1)]);
        assert_eq!(
            outcome.warnings,
            vec![
                AnalysisWarning::SelfCitation {
                    record: RecordId(0)
                },
                AnalysisWarning::DanglingCitation {
                    from: RecordId(0),
                    target: 7
                },
                AnalysisWarning::DuplicateCitation {
                    from: RecordId(0),
                    to: RecordId(1)
                },
                AnalysisWarning::DanglingCitation {
                    from: RecordId(0),
                    target: -2
                },
            ]
        );
    }

    #[test]
    fn inferred_weight_is_one_minus_score() {
        let records = RecordSet::new(vec![
            Record::new(0, "alpha beta gamma delta"),
            Record::new(1, "alpha beta gamma epsilon"),
        ])
        .unwrap();
        let outcome = infer_edges(&records, &title_only()).unwrap();

        assert_eq!(pairs(&outcome), vec![(1, 0)]);
        let edge = outcome.edges[0];
        assert!((edge.weight - 0.4).abs() < 1e-12);
        assert!(matches!(edge.origin, EdgeOrigin::Inferred { score } if (score - 0.6).abs() < 1e-12));
    }

    #[test]
    fn threshold_filters_weak_pairs() {
        let records = RecordSet::new(vec![
            Record::new(0, "alpha beta gamma delta"),
            Record::new(1, "alpha beta gamma epsilon"),
        ])
        .unwrap();
        let config = AnalysisConfig {
            similarity_threshold: 0.61,
            ..title_only()
        };
        assert!(infer_edges(&records, &config).unwrap().edges.is_empty());
    }

    #[test]
    fn max_outgoing_keeps_strongest_then_lowest_id() {
        let records = RecordSet::new(vec![
            Record::new(0, "a b c d"),
            Record::new(1, "a b c x"),
            Record::new(2, "a b c d"),
            Record::new(3, "a b c d"),
            Record::new(4, "a b c d"),
        ])
        .unwrap();
        let config = AnalysisConfig {
            max_outgoing_per_node: Some(2),
            ..title_only()
        };
        let outcome = infer_edges(&records, &config).unwrap();
        let from_four: Vec<usize> = outcome
            .edges
            .iter()
            .filter(|e| e.from == RecordId(4))
            .map(|e| e.to.0)
            .collect();
        // 0, 2 and 3 tie at score 1.0; 1 scores 0.6.
        assert_eq!(from_four, vec![0, 2]);
        assert!(outcome.edges.iter().all(|e| outcome
            .edges
            .iter()
            .filter(|o| o.from == e.from)
            .count()
            <= 2));
    }

    #[test]
    fn parallel_and_sequential_sweeps_agree() {
        let records = RecordSet::new(
            (0..40)
                .map(|i| {
                    Record::new(i, &format!("topic {} study {}", i % 4, i % 3))
                        .with_year(Some(2000 + i32::try_from(i % 5).unwrap()))
                })
                .collect(),
        )
        .unwrap();
        let parallel = infer_edges(&records, &title_only()).unwrap();
        let sequential = infer_edges(
            &records,
            &AnalysisConfig {
                parallel: false,
                ..title_only()
            },
        )
        .unwrap();
        assert!(!parallel.edges.is_empty());
        assert_eq!(parallel.edges, sequential.edges);
    }

    #[test]
    fn invalid_threshold_fails_before_any_work() {
        let config = AnalysisConfig {
            similarity_threshold: 0.0,
            ..AnalysisConfig::default()
        };
        let records = RecordSet::new(vec![Record::new(0, "x")]).unwrap();
        assert!(matches!(
            infer_edges(&records, &config),
            Err(crate::Error::InvalidConfiguration(_))
        ));
    }

    struct NoCitations;

    impl DirectionPolicy for NoCitations {
        fn may_cite(&self, _citing: &Record, _cited: &Record) -> bool {
            false
        }
    }

    #[rstest]
    fn custom_policy_is_honored(same_title_records: RecordSet) {
        let engine = EdgeInference::with_policy(&title_only(), NoCitations).unwrap();
        assert!(engine.infer(&same_title_records).edges.is_empty());
    }

    #[rstest]
    #[case::canonical("year-then-id", DirectionRule::YearThenId)]
    #[case::mixed_case("ID-Order", DirectionRule::IdOrder)]
    #[case::padded(" unrestricted ", DirectionRule::Unrestricted)]
    fn direction_rule_parses(#[case] input: &str, #[case] expected: DirectionRule) {
        assert_eq!(input.parse::<DirectionRule>().unwrap(), expected);
    }

    #[test]
    fn unknown_direction_rule_is_rejected() {
        assert!("newest-first".parse::<DirectionRule>().is_err());
    }
}
