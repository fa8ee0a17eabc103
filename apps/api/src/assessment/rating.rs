use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::{Analysis, CriterionWeights, RatingThresholds, ScoringConfig};

/// Slack for threshold comparisons, so sums like 0.25 + 0.15 land on the
/// 0.4 boundary despite binary rounding.
const SCORE_EPSILON: f64 = 1e-9;

/// Three-level merit classification. Ordered low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    Medium,
    High,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Low => "low",
            Rating::Medium => "medium",
            Rating::High => "high",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary-presence scorer: each criterion with any evidence contributes its
/// full weight, regardless of how many fragments back it.
#[derive(Debug, Clone, Default)]
pub struct RatingClassifier {
    weights: CriterionWeights,
    thresholds: RatingThresholds,
}

impl RatingClassifier {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            weights: config.weights().clone(),
            thresholds: config.thresholds(),
        }
    }

    /// Sum of the weights of satisfied criteria. Always within [0, 1].
    pub fn score(&self, analysis: &Analysis) -> f64 {
        analysis
            .iter()
            .filter(|(_, evidence)| !evidence.is_empty())
            .map(|(criterion, _)| self.weights.weight(criterion))
            .sum()
    }

    pub fn classify(&self, score: f64) -> Rating {
        if score + SCORE_EPSILON >= self.thresholds.medium_cut() {
            Rating::High
        } else if score + SCORE_EPSILON >= self.thresholds.low_cut() {
            Rating::Medium
        } else {
            Rating::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Criterion, Evidence};

    fn analysis_with(criteria: &[Criterion]) -> Analysis {
        let mut analysis = Analysis::empty();
        for criterion in criteria {
            analysis.push(*criterion, Evidence::new("found").unwrap());
        }
        analysis
    }

    fn rate(criteria: &[Criterion]) -> (f64, Rating) {
        let classifier = RatingClassifier::default();
        let score = classifier.score(&analysis_with(criteria));
        (score, classifier.classify(score))
    }

    #[test]
    fn test_empty_analysis_is_low() {
        assert_eq!(rate(&[]), (0.0, Rating::Low));
    }

    #[test]
    fn test_single_awards_hit_is_low() {
        let (score, rating) = rate(&[Criterion::Awards]);
        assert!((score - 0.25).abs() < 1e-9);
        assert_eq!(rating, Rating::Low);
    }

    #[test]
    fn test_combined_hits_are_medium() {
        let (score, rating) = rate(&[Criterion::Awards, Criterion::Membership, Criterion::Press]);
        assert!((score - 0.42).abs() < 1e-9);
        assert_eq!(rating, Rating::Medium);
    }

    #[test]
    fn test_all_but_critical_employment_is_high() {
        let criteria: Vec<Criterion> = Criterion::ALL
            .into_iter()
            .filter(|c| *c != Criterion::CriticalEmployment)
            .collect();
        let (score, rating) = rate(&criteria);
        assert!((score - 0.97).abs() < 1e-9);
        assert_eq!(rating, Rating::High);
    }

    #[test]
    fn test_score_exactly_on_low_cut_is_medium() {
        let (_, rating) = rate(&[Criterion::Awards, Criterion::ScholarlyArticles]);
        assert_eq!(rating, Rating::Medium);
    }

    #[test]
    fn test_score_exactly_on_medium_cut_is_high() {
        let (_, rating) = rate(&[
            Criterion::Awards,
            Criterion::OriginalContribution,
            Criterion::ScholarlyArticles,
            Criterion::Membership,
        ]);
        assert_eq!(rating, Rating::High);
    }

    #[test]
    fn test_threshold_edges() {
        let classifier = RatingClassifier::default();
        assert_eq!(classifier.classify(0.3999), Rating::Low);
        assert_eq!(classifier.classify(0.4), Rating::Medium);
        assert_eq!(classifier.classify(0.6999), Rating::Medium);
        assert_eq!(classifier.classify(0.7), Rating::High);
        assert_eq!(classifier.classify(1.0), Rating::High);
    }

    #[test]
    fn test_evidence_count_does_not_change_score() {
        let classifier = RatingClassifier::default();
        let mut analysis = analysis_with(&[Criterion::Awards]);
        let before = classifier.score(&analysis);
        analysis.push(Criterion::Awards, Evidence::new("again").unwrap());
        assert_eq!(classifier.score(&analysis), before);
    }

    #[test]
    fn test_adding_evidence_never_lowers_rating() {
        let classifier = RatingClassifier::default();
        let mut analysis = Analysis::empty();
        let mut last = (classifier.score(&analysis), classifier.classify(0.0));
        for criterion in Criterion::ALL.into_iter().rev() {
            analysis.push(criterion, Evidence::new("found").unwrap());
            let score = classifier.score(&analysis);
            let rating = classifier.classify(score);
            assert!(score >= last.0);
            assert!(rating >= last.1);
            last = (score, rating);
        }
        assert_eq!(last.1, Rating::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ScoringConfig::new(
            CriterionWeights::default(),
            RatingThresholds::new(0.2, 0.3).unwrap(),
        );
        let classifier = RatingClassifier::new(config);
        let score = classifier.score(&analysis_with(&[Criterion::Awards]));
        assert_eq!(classifier.classify(score), Rating::Medium);
    }

    #[test]
    fn test_rating_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rating::Medium).unwrap(), "\"medium\"");
    }
}
