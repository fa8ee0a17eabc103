//! Pattern matching: the token-predicate grammar and the scanner that turns
//! it into per-criterion evidence.

mod matcher;
mod predicate;
mod rules;

pub use matcher::{PatternMatcher, PatternMatches};
pub use predicate::{Pattern, TokenPredicate};
pub use rules::PatternRuleSet;
