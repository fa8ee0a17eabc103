use tracing::trace;

use crate::annotation::{AnnotatedDocument, EntityLabel};
use crate::criteria::Evidence;

const WINDOW_RADIUS: usize = 2;
const SALARY_KEYWORDS: &[&str] = &["salary", "compensation", "earned"];

/// Pulls compensation evidence out of MONEY tokens.
///
/// For every MONEY token, the window of `radius` tokens either side is
/// rebuilt twice: from lowercase forms for the keyword test and from the
/// original text for the returned evidence. Keywords are literal,
/// case-sensitive substrings of the lowercase window. One fragment per MONEY
/// token; nothing is deduplicated.
#[derive(Debug, Clone)]
pub struct SalaryContextExtractor {
    radius: usize,
    keywords: Vec<String>,
}

impl Default for SalaryContextExtractor {
    fn default() -> Self {
        Self {
            radius: WINDOW_RADIUS,
            keywords: SALARY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl SalaryContextExtractor {
    pub fn extract(&self, doc: &AnnotatedDocument) -> Vec<Evidence> {
        let tokens = doc.tokens();
        let mut fragments = Vec::new();

        for (idx, token) in tokens.iter().enumerate() {
            if !token.has_entity(&EntityLabel::Money) {
                continue;
            }
            let start = idx.saturating_sub(self.radius);
            let end = (idx + self.radius + 1).min(tokens.len());

            let window = doc.span_lower(start, end);
            if !self.keywords.iter().any(|k| window.contains(k.as_str())) {
                trace!(token = %token.text, "money mention without salary context");
                continue;
            }
            if let Some(evidence) = Evidence::new(doc.span_text(start, end)) {
                fragments.push(evidence);
            }
        }

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::doc_from_words;
    use crate::annotation::{Annotator, LexiconAnnotator};

    fn texts(evidence: &[Evidence]) -> Vec<&str> {
        evidence.iter().map(Evidence::as_str).collect()
    }

    #[test]
    fn test_money_without_keyword_is_ignored() {
        let doc = doc_from_words("raised $2M in seed funding", &[(1, EntityLabel::Money)]);
        assert!(SalaryContextExtractor::default().extract(&doc).is_empty());
    }

    #[test]
    fn test_earned_in_window_yields_one_fragment() {
        let doc = doc_from_words(
            "In 2022 I earned $410,000 in total pay",
            &[(4, EntityLabel::Money)],
        );
        let fragments = SalaryContextExtractor::default().extract(&doc);
        assert_eq!(texts(&fragments), vec!["I earned $410,000 in total"]);
    }

    #[test]
    fn test_keyword_outside_window_is_ignored() {
        let doc = doc_from_words(
            "salary details are listed : $300,000",
            &[(5, EntityLabel::Money)],
        );
        assert!(SalaryContextExtractor::default().extract(&doc).is_empty());
    }

    #[test]
    fn test_window_clipped_at_document_edges() {
        let doc = doc_from_words("$500,000 salary", &[(0, EntityLabel::Money)]);
        let fragments = SalaryContextExtractor::default().extract(&doc);
        assert_eq!(texts(&fragments), vec!["$500,000 salary"]);
    }

    #[test]
    fn test_keyword_test_uses_lowercase_view() {
        let doc = doc_from_words("Base SALARY: $250,000", &[(2, EntityLabel::Money)]);
        let fragments = SalaryContextExtractor::default().extract(&doc);
        assert_eq!(texts(&fragments), vec!["Base SALARY: $250,000"]);
    }

    #[test]
    fn test_keyword_matches_as_substring() {
        let doc = doc_from_words("salaryband $90,000", &[(1, EntityLabel::Money)]);
        assert_eq!(SalaryContextExtractor::default().extract(&doc).len(), 1);
    }

    #[test]
    fn test_each_money_token_checked_separately() {
        let doc = doc_from_words(
            "salary of 300,000 USD",
            &[(2, EntityLabel::Money), (3, EntityLabel::Money)],
        );
        let fragments = SalaryContextExtractor::default().extract(&doc);
        assert_eq!(texts(&fragments), vec!["salary of 300,000 USD"]);
    }

    #[test]
    fn test_with_lexicon_annotator() {
        let doc = LexiconAnnotator::new()
            .annotate("Total compensation reached $1.2M last year; donated $5,000 to charity.")
            .unwrap();
        let fragments = SalaryContextExtractor::default().extract(&doc);
        assert_eq!(texts(&fragments), vec!["compensation reached $1.2M last year"]);
    }
}
