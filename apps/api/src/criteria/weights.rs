use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Criterion, ScoringConfigError};

/// Tolerance for the weights-sum-to-one invariant.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

const DEFAULT_WEIGHTS: [(Criterion, f64); Criterion::COUNT] = [
    (Criterion::Awards, 0.25),
    (Criterion::OriginalContribution, 0.20),
    (Criterion::ScholarlyArticles, 0.15),
    (Criterion::HighRemuneration, 0.15),
    (Criterion::Membership, 0.10),
    (Criterion::Press, 0.07),
    (Criterion::Judging, 0.05),
    (Criterion::CriticalEmployment, 0.03),
];

/// Per-criterion weight table. Every criterion has a weight in (0, 1] and the
/// weights sum to 1.0; both are checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionWeights {
    weights: [f64; Criterion::COUNT],
}

impl Default for CriterionWeights {
    fn default() -> Self {
        let mut weights = [0.0; Criterion::COUNT];
        for (criterion, weight) in DEFAULT_WEIGHTS {
            weights[criterion.index()] = weight;
        }
        Self { weights }
    }
}

impl CriterionWeights {
    /// Builds a table from `(criterion key, weight)` pairs.
    ///
    /// Fails on unknown keys, on a criterion supplied twice (including via the
    /// `memberships` alias), on any missing criterion, and when the weights
    /// break the range or sum invariants.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, ScoringConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; Criterion::COUNT] = [None; Criterion::COUNT];

        for (key, weight) in entries {
            let criterion: Criterion = key.as_ref().parse()?;
            let slot = &mut slots[criterion.index()];
            if slot.is_some() {
                return Err(ScoringConfigError::DuplicateCriterion(criterion));
            }
            if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
                return Err(ScoringConfigError::WeightOutOfRange { criterion, weight });
            }
            *slot = Some(weight);
        }

        let mut weights = [0.0; Criterion::COUNT];
        for criterion in Criterion::ALL {
            weights[criterion.index()] =
                slots[criterion.index()].ok_or(ScoringConfigError::MissingCriterion(criterion))?;
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ScoringConfigError::WeightSum { sum });
        }

        Ok(Self { weights })
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.weights[criterion.index()]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL
            .into_iter()
            .map(move |c| (c, self.weights[c.index()]))
    }
}

/// Score cut points: `[0, low_cut)` is low, `[low_cut, medium_cut)` is medium,
/// `[medium_cut, 1]` is high. Only constructible through `new` or `Default`,
/// so `0 < low_cut < medium_cut <= 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingThresholds {
    low_cut: f64,
    medium_cut: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            low_cut: 0.4,
            medium_cut: 0.7,
        }
    }
}

impl RatingThresholds {
    pub fn new(low_cut: f64, medium_cut: f64) -> Result<Self, ScoringConfigError> {
        let valid = low_cut.is_finite()
            && medium_cut.is_finite()
            && low_cut > 0.0
            && low_cut < medium_cut
            && medium_cut <= 1.0;
        if !valid {
            return Err(ScoringConfigError::InvalidThresholds {
                low_cut,
                medium_cut,
            });
        }
        Ok(Self {
            low_cut,
            medium_cut,
        })
    }

    pub fn low_cut(&self) -> f64 {
        self.low_cut
    }

    pub fn medium_cut(&self) -> f64 {
        self.medium_cut
    }
}

/// Weights plus thresholds; loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    weights: CriterionWeights,
    thresholds: RatingThresholds,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScoringConfig {
    weights: Option<BTreeMap<String, f64>>,
    thresholds: Option<RawThresholds>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawThresholds {
    low_cut: f64,
    medium_cut: f64,
}

impl ScoringConfig {
    pub fn new(weights: CriterionWeights, thresholds: RatingThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn weights(&self) -> &CriterionWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> RatingThresholds {
        self.thresholds
    }

    /// Parses a JSON override. Omitted sections keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ScoringConfigError> {
        let parsed: RawScoringConfig = serde_json::from_str(raw)?;

        let weights = match parsed.weights {
            Some(map) => CriterionWeights::from_entries(map)?,
            None => CriterionWeights::default(),
        };
        let thresholds = match parsed.thresholds {
            Some(t) => RatingThresholds::new(t.low_cut, t.medium_cut)?,
            None => RatingThresholds::default(),
        };

        Ok(Self {
            weights,
            thresholds,
        })
    }
}
