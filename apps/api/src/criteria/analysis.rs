use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::Criterion;

/// A non-empty text fragment supporting a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Evidence(String);

impl Evidence {
    /// Returns `None` for empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Evidence for every criterion of one document.
///
/// Backed by a fixed-size table indexed by `Criterion`, so every criterion has
/// exactly one (possibly empty) entry by construction. Evidence keeps discovery
/// order and is not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    evidence: [Vec<Evidence>; Criterion::COUNT],
}

impl Analysis {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, criterion: Criterion, evidence: Evidence) {
        self.evidence[criterion.index()].push(evidence);
    }

    pub fn extend(&mut self, criterion: Criterion, evidence: impl IntoIterator<Item = Evidence>) {
        self.evidence[criterion.index()].extend(evidence);
    }

    pub fn evidence(&self, criterion: Criterion) -> &[Evidence] {
        &self.evidence[criterion.index()]
    }

    pub fn is_satisfied(&self, criterion: Criterion) -> bool {
        !self.evidence[criterion.index()].is_empty()
    }

    pub fn satisfied_count(&self) -> usize {
        self.evidence.iter().filter(|e| !e.is_empty()).count()
    }

    /// Criteria with their evidence, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &[Evidence])> {
        Criterion::ALL
            .into_iter()
            .map(move |c| (c, self.evidence[c.index()].as_slice()))
    }

    /// Consumes the analysis into one result per criterion, in canonical order.
    pub fn into_results(self, assessable: impl Fn(Criterion) -> bool) -> Vec<CriterionResult> {
        Criterion::ALL
            .into_iter()
            .zip(self.evidence)
            .map(|(criterion, evidence)| {
                CriterionResult::new(criterion, evidence, assessable(criterion))
            })
            .collect()
    }
}

impl Serialize for Analysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Criterion::COUNT))?;
        for (criterion, evidence) in self.iter() {
            map.serialize_entry(criterion.as_str(), evidence)?;
        }
        map.end()
    }
}

/// Per-criterion outcome. `satisfied` is derived from the evidence and cannot
/// be set independently. `assessable` is false for criteria the engine has no
/// extraction method for; those can never be satisfied automatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionResult {
    criterion: Criterion,
    evidence: Vec<Evidence>,
    satisfied: bool,
    assessable: bool,
}

impl CriterionResult {
    pub fn new(criterion: Criterion, evidence: Vec<Evidence>, assessable: bool) -> Self {
        let satisfied = !evidence.is_empty();
        Self {
            criterion,
            evidence,
            satisfied,
            assessable,
        }
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    pub fn satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn assessable(&self) -> bool {
        self.assessable
    }
}
