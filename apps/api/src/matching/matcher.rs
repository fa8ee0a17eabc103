use std::collections::BTreeMap;

use tracing::trace;

use crate::annotation::AnnotatedDocument;
use crate::criteria::{Criterion, Evidence};

use super::rules::PatternRuleSet;

/// Evidence per pattern-backed criterion.
pub type PatternMatches = BTreeMap<Criterion, Vec<Evidence>>;

/// Scans annotated tokens against a `PatternRuleSet`.
///
/// Each criterion is matched independently, so one span can count for several
/// criteria. Within a criterion every match is kept, overlapping or not,
/// ordered by start position and then by pattern declaration order.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: PatternRuleSet,
}

impl PatternMatcher {
    pub fn new(rules: PatternRuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PatternRuleSet {
        &self.rules
    }

    /// Returns an entry for every criterion that has at least one pattern,
    /// empty when nothing matched.
    pub fn find(&self, doc: &AnnotatedDocument) -> PatternMatches {
        let tokens = doc.tokens();
        let mut matches = PatternMatches::new();

        for criterion in self.rules.criteria() {
            let patterns = self.rules.patterns(criterion);
            let mut evidence = Vec::new();

            for start in 0..tokens.len() {
                for pattern in patterns {
                    if !pattern.matches_at(tokens, start) {
                        continue;
                    }
                    let end = start + pattern.len();
                    if let Some(found) = Evidence::new(doc.span_text(start, end)) {
                        trace!(%criterion, start, end, evidence = %found, "pattern match");
                        evidence.push(found);
                    }
                }
            }

            matches.insert(criterion, evidence);
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::doc_from_words;
    use crate::annotation::{Annotator, EntityLabel, LexiconAnnotator};
    use crate::matching::{Pattern, TokenPredicate};

    fn texts(evidence: &[Evidence]) -> Vec<&str> {
        evidence.iter().map(Evidence::as_str).collect()
    }

    #[test]
    fn test_reports_every_pattern_criterion_even_without_matches() {
        let matcher = PatternMatcher::new(PatternRuleSet::standard());
        let matches = matcher.find(&AnnotatedDocument::empty());
        assert_eq!(matches.len(), 4);
        assert!(matches.values().all(Vec::is_empty));
        assert!(!matches.contains_key(&Criterion::ScholarlyArticles));
    }

    #[test]
    fn test_membership_match_keeps_original_case() {
        let doc = doc_from_words("Elected Member of IEEE in 2018", &[(3, EntityLabel::Organization)]);
        let matcher = PatternMatcher::new(PatternRuleSet::standard());
        let matches = matcher.find(&doc);
        assert_eq!(texts(&matches[&Criterion::Membership]), vec!["Member of IEEE"]);
    }

    #[test]
    fn test_same_span_counts_for_several_criteria() {
        let rules = PatternRuleSet::empty()
            .with(
                Criterion::Awards,
                Pattern::new(vec![TokenPredicate::lower("nobel")]),
            )
            .with(
                Criterion::Press,
                Pattern::new(vec![TokenPredicate::lower("nobel")]),
            );
        let doc = doc_from_words("Nobel laureate", &[]);
        let matches = PatternMatcher::new(rules).find(&doc);
        assert_eq!(texts(&matches[&Criterion::Awards]), vec!["Nobel"]);
        assert_eq!(texts(&matches[&Criterion::Press]), vec!["Nobel"]);
    }

    #[test]
    fn test_overlapping_matches_within_criterion_are_kept() {
        let rules = PatternRuleSet::empty()
            .with(
                Criterion::Awards,
                Pattern::new(vec![TokenPredicate::lower("best"), TokenPredicate::lower("paper")]),
            )
            .with(
                Criterion::Awards,
                Pattern::new(vec![TokenPredicate::lower("paper"), TokenPredicate::lower("award")]),
            )
            .with(
                Criterion::Awards,
                Pattern::new(vec![TokenPredicate::lower("best")]),
            );
        let doc = doc_from_words("Best Paper Award", &[]);
        let matches = PatternMatcher::new(rules).find(&doc);
        assert_eq!(
            texts(&matches[&Criterion::Awards]),
            vec!["Best Paper", "Best", "Paper Award"]
        );
    }

    #[test]
    fn test_repeated_phrase_yields_duplicate_evidence() {
        let doc = doc_from_words(
            "featured in WIRED and featured in WIRED",
            &[(2, EntityLabel::Organization), (6, EntityLabel::Organization)],
        );
        let matches = PatternMatcher::new(PatternRuleSet::standard()).find(&doc);
        assert_eq!(
            texts(&matches[&Criterion::Press]),
            vec!["featured in WIRED", "featured in WIRED"]
        );
    }

    #[test]
    fn test_missing_entity_label_never_matches() {
        let doc = doc_from_words("award IEEE", &[]);
        let matches = PatternMatcher::new(PatternRuleSet::standard()).find(&doc);
        assert!(matches[&Criterion::Awards].is_empty());
    }

    #[test]
    fn test_standard_rules_on_annotated_cv() {
        let text = "Received the Best Paper Award from IEEE. Fellow of ACM. \
                    Featured in Forbes. Reviewed submissions for the Program Committee ACM SIGMOD.";
        let doc = LexiconAnnotator::new().annotate(text).unwrap();
        let matches = PatternMatcher::new(PatternRuleSet::standard()).find(&doc);

        assert_eq!(texts(&matches[&Criterion::Awards]), vec!["Award from IEEE"]);
        assert_eq!(texts(&matches[&Criterion::Membership]), vec!["Fellow of ACM"]);
        assert_eq!(texts(&matches[&Criterion::Press]), vec!["Featured in Forbes"]);
        assert_eq!(
            texts(&matches[&Criterion::Judging]),
            vec!["Reviewed submissions", "Program Committee ACM"]
        );
    }
}
