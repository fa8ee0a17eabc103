use crate::annotation::{EntityLabel, Token};

/// A boolean test over one token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPredicate {
    /// Lowercase form is one of the listed words.
    LowerIn(Vec<String>),
    /// Lemma is one of the listed words.
    LemmaIn(Vec<String>),
    /// Token carries this entity label.
    Entity(EntityLabel),
}

impl TokenPredicate {
    pub fn lower(word: &str) -> Self {
        TokenPredicate::LowerIn(vec![word.to_string()])
    }

    pub fn lower_in(words: &[&str]) -> Self {
        TokenPredicate::LowerIn(words.iter().map(|w| w.to_string()).collect())
    }

    pub fn lemma_in(words: &[&str]) -> Self {
        TokenPredicate::LemmaIn(words.iter().map(|w| w.to_string()).collect())
    }

    pub fn entity(label: EntityLabel) -> Self {
        TokenPredicate::Entity(label)
    }

    pub fn matches(&self, token: &Token) -> bool {
        match self {
            TokenPredicate::LowerIn(words) => words.iter().any(|w| *w == token.lower),
            TokenPredicate::LemmaIn(words) => words.iter().any(|w| *w == token.lemma),
            TokenPredicate::Entity(label) => token.has_entity(label),
        }
    }
}

/// An ordered sequence of predicates, matched against consecutive tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    predicates: Vec<TokenPredicate>,
}

impl Pattern {
    pub fn new(predicates: Vec<TokenPredicate>) -> Self {
        Self { predicates }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// True when the predicates match `tokens[start..start + len]` in order.
    /// An empty pattern never matches.
    pub fn matches_at(&self, tokens: &[Token], start: usize) -> bool {
        if self.predicates.is_empty() {
            return false;
        }
        let Some(window) = tokens.get(start..start + self.predicates.len()) else {
            return false;
        };
        self.predicates
            .iter()
            .zip(window)
            .all(|(predicate, token)| predicate.matches(token))
    }
}
