use crate::annotation::{AnnotatedDocument, EntityLabel};
use crate::criteria::{Analysis, Criterion, Evidence};
use crate::matching::PatternMatcher;

use super::salary::SalaryContextExtractor;

/// Criterion fed by the creative-work entity scan.
const ENTITY_SCAN_CRITERION: Criterion = Criterion::ScholarlyArticles;
/// Criterion fed by the salary context extractor.
const SALARY_CRITERION: Criterion = Criterion::HighRemuneration;

/// Merges every extraction method into one `Analysis`.
///
/// Per criterion, pattern evidence comes first, then entity-scan or salary
/// evidence. Criteria no method covers stay empty and are reported as not
/// assessable.
#[derive(Debug, Clone)]
pub struct CriteriaAggregator {
    matcher: PatternMatcher,
    salary: SalaryContextExtractor,
}

impl CriteriaAggregator {
    pub fn new(matcher: PatternMatcher, salary: SalaryContextExtractor) -> Self {
        Self { matcher, salary }
    }

    pub fn analyze(&self, doc: &AnnotatedDocument) -> Analysis {
        let mut analysis = Analysis::empty();

        for (criterion, evidence) in self.matcher.find(doc) {
            analysis.extend(criterion, evidence);
        }
        analysis.extend(ENTITY_SCAN_CRITERION, creative_works(doc));
        analysis.extend(SALARY_CRITERION, self.salary.extract(doc));

        analysis
    }

    /// Whether any extraction method can produce evidence for `criterion`.
    pub fn is_assessable(&self, criterion: Criterion) -> bool {
        criterion == ENTITY_SCAN_CRITERION
            || criterion == SALARY_CRITERION
            || self.matcher.rules().has_patterns(criterion)
    }
}

/// Literal text of every WORK_OF_ART entity, in document order.
fn creative_works(doc: &AnnotatedDocument) -> Vec<Evidence> {
    doc.entities()
        .iter()
        .filter(|e| e.label == EntityLabel::WorkOfArt)
        .filter_map(|e| Evidence::new(e.text.clone()))
        .collect()
}
