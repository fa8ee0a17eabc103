use crate::annotation::EntityLabel;
use crate::criteria::Criterion;

use super::predicate::{Pattern, TokenPredicate};

/// Criterion → patterns table. Built once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternRuleSet {
    patterns: [Vec<Pattern>; Criterion::COUNT],
}

impl PatternRuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: Criterion, pattern: Pattern) -> Self {
        self.patterns[criterion.index()].push(pattern);
        self
    }

    /// The stock matching grammar for CV text. Word tests run on the
    /// lowercase form, so capitalisation in the source does not matter.
    pub fn standard() -> Self {
        let word = TokenPredicate::lower;
        let org = || TokenPredicate::entity(EntityLabel::Organization);
        let award_word = || TokenPredicate::lower_in(&["award", "prize", "medal"]);

        Self::empty()
            .with(Criterion::Awards, Pattern::new(vec![award_word(), org()]))
            .with(
                Criterion::Awards,
                Pattern::new(vec![
                    award_word(),
                    TokenPredicate::lower_in(&["from", "by"]),
                    org(),
                ]),
            )
            .with(
                Criterion::Membership,
                Pattern::new(vec![word("member"), word("of"), org()]),
            )
            .with(
                Criterion::Membership,
                Pattern::new(vec![word("fellow"), word("of"), org()]),
            )
            .with(
                Criterion::Press,
                Pattern::new(vec![org(), word("interview"), word("with")]),
            )
            .with(
                Criterion::Press,
                Pattern::new(vec![word("featured"), word("in"), org()]),
            )
            .with(
                Criterion::Judging,
                Pattern::new(vec![
                    TokenPredicate::lemma_in(&["review", "judge", "evaluate"]),
                    word("submissions"),
                ]),
            )
            .with(
                Criterion::Judging,
                Pattern::new(vec![word("program"), word("committee"), org()]),
            )
    }

    pub fn patterns(&self, criterion: Criterion) -> &[Pattern] {
        &self.patterns[criterion.index()]
    }

    pub fn has_patterns(&self, criterion: Criterion) -> bool {
        !self.patterns[criterion.index()].is_empty()
    }

    /// Criteria with at least one pattern, in canonical order.
    pub fn criteria(&self) -> impl Iterator<Item = Criterion> + '_ {
        Criterion::ALL
            .into_iter()
            .filter(move |c| self.has_patterns(*c))
    }
}
