//! Assessment turns CV text into per-criterion evidence, a score and a
//! rating.
//!
//! Flow: annotate → pattern match + entity scan + salary context → aggregate →
//!       score → classify.
//!
//! `Assessor` is immutable after construction and safe to share across
//! request handlers behind an `Arc`.

mod aggregator;
mod rating;
mod salary;

pub use aggregator::CriteriaAggregator;
pub use rating::{Rating, RatingClassifier};
pub use salary::SalaryContextExtractor;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::annotation::{AnnotatedDocument, AnnotationError, Annotator};
use crate::criteria::{CriterionResult, ScoringConfig};
use crate::matching::{PatternMatcher, PatternRuleSet};

#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The annotator failed. Never retried and never downgraded to an empty
    /// result.
    #[error("annotation failed: {0}")]
    Annotation(#[from] AnnotationError),
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// Outcome for one document: every criterion in canonical order, the binary
/// presence score and its rating band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub criteria: Vec<CriterionResult>,
    pub score: f64,
    pub rating: Rating,
}

impl Assessment {
    pub fn satisfied_count(&self) -> usize {
        self.criteria.iter().filter(|c| c.satisfied()).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assessor
// ────────────────────────────────────────────────────────────────────────────

pub struct Assessor {
    annotator: Arc<dyn Annotator>,
    aggregator: CriteriaAggregator,
    classifier: RatingClassifier,
}

impl Assessor {
    pub fn new(annotator: Arc<dyn Annotator>, rules: PatternRuleSet, config: ScoringConfig) -> Self {
        Self {
            annotator,
            aggregator: CriteriaAggregator::new(
                PatternMatcher::new(rules),
                SalaryContextExtractor::default(),
            ),
            classifier: RatingClassifier::new(config),
        }
    }

    /// Annotates `text` and assesses it. All-or-nothing: an annotator failure
    /// is returned as is and no partial assessment is produced.
    pub fn assess(&self, text: &str) -> Result<Assessment, AssessmentError> {
        let doc = self.annotator.annotate(text)?;
        Ok(self.assess_document(&doc))
    }

    /// Assesses an already annotated document. Empty documents yield an
    /// all-empty analysis and a low rating.
    pub fn assess_document(&self, doc: &AnnotatedDocument) -> Assessment {
        let analysis = self.aggregator.analyze(doc);
        let score = self.classifier.score(&analysis);
        let rating = self.classifier.classify(score);

        debug!(
            tokens = doc.tokens().len(),
            satisfied = analysis.satisfied_count(),
            score,
            %rating,
            "assessment complete"
        );

        let criteria = analysis.into_results(|c| self.aggregator.is_assessable(c));
        Assessment {
            criteria,
            score,
            rating,
        }
    }
}
