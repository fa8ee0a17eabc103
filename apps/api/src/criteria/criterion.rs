use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScoringConfigError;

/// One dimension of professional-merit evidence. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Awards,
    OriginalContribution,
    ScholarlyArticles,
    HighRemuneration,
    #[serde(alias = "memberships")]
    Membership,
    Press,
    Judging,
    CriticalEmployment,
}

impl Criterion {
    pub const COUNT: usize = 8;

    /// Every criterion, in canonical (weight-descending) order.
    pub const ALL: [Criterion; Criterion::COUNT] = [
        Criterion::Awards,
        Criterion::OriginalContribution,
        Criterion::ScholarlyArticles,
        Criterion::HighRemuneration,
        Criterion::Membership,
        Criterion::Press,
        Criterion::Judging,
        Criterion::CriticalEmployment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Awards => "awards",
            Criterion::OriginalContribution => "original_contribution",
            Criterion::ScholarlyArticles => "scholarly_articles",
            Criterion::HighRemuneration => "high_remuneration",
            Criterion::Membership => "membership",
            Criterion::Press => "press",
            Criterion::Judging => "judging",
            Criterion::CriticalEmployment => "critical_employment",
        }
    }

    /// Position in `ALL`; used to index fixed-size per-criterion tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = ScoringConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "memberships" => Ok(Criterion::Membership),
            key => Criterion::ALL
                .into_iter()
                .find(|c| c.as_str() == key)
                .ok_or_else(|| ScoringConfigError::UnrecognizedCriterion(raw.to_string())),
        }
    }
}
