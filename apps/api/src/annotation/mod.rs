//! Annotation: the boundary between raw CV text and the rule engine.
//!
//! The engine never tokenizes or tags text itself. It consumes an
//! `AnnotatedDocument` produced by an `Annotator`. `LexiconAnnotator` is the
//! built-in rule-based implementation; an external NLP service can be plugged in
//! behind the same trait.

mod lemma;
mod lexicon;

pub use lexicon::LexiconAnnotator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("annotator failed: {0}")]
    Failed(String),

    #[error("token {index} spans {start}..{end}, outside the {len}-byte source text")]
    TokenOutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("token {index} starts at byte {start}, before the previous token ends at {prev_end}")]
    TokensOutOfOrder {
        index: usize,
        start: usize,
        prev_end: usize,
    },

    #[error("entity '{label}' covers tokens {start}..{end}, but the document has {len} tokens")]
    EntityOutOfBounds {
        label: EntityLabel,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Converts raw text into tokens and entity spans.
///
/// Implementations must be safe for concurrent read-only use; one instance is
/// shared by every in-flight assessment.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Entity labels
// ────────────────────────────────────────────────────────────────────────────

/// Category tag attached to a span by the annotator.
///
/// `Other` carries labels this crate has no special handling for. Patterns that
/// reference a label no annotator emits simply never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Organization,
    Money,
    WorkOfArt,
    Date,
    Location,
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Money => "MONEY",
            EntityLabel::WorkOfArt => "WORK_OF_ART",
            EntityLabel::Date => "DATE",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Other(name) => name,
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLabel {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let upper = raw.trim().to_ascii_uppercase();
        Ok(match upper.as_str() {
            "PERSON" => EntityLabel::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityLabel::Organization,
            "MONEY" => EntityLabel::Money,
            "WORK_OF_ART" | "CREATIVE_WORK" => EntityLabel::WorkOfArt,
            "DATE" => EntityLabel::Date,
            "GPE" | "LOC" | "LOCATION" => EntityLabel::Location,
            _ => EntityLabel::Other(upper),
        })
    }
}

impl Serialize for EntityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(EntityLabel::Other(raw)))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokens and documents
// ────────────────────────────────────────────────────────────────────────────

/// A single annotated token. `start..end` is its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub lemma: String,
    pub entity: Option<EntityLabel>,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn has_entity(&self, label: &EntityLabel) -> bool {
        self.entity.as_ref() == Some(label)
    }
}

/// An entity covering tokens `start..end` (exclusive end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Source text plus its token sequence and entity spans.
///
/// Constructed through `new`, which checks every offset and requires tokens to
/// be ordered and non-overlapping, so span reconstruction never slices outside
/// the text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedDocument {
    text: String,
    tokens: Vec<Token>,
    entities: Vec<EntitySpan>,
}

impl AnnotatedDocument {
    pub fn new(
        text: impl Into<String>,
        tokens: Vec<Token>,
        entities: Vec<EntitySpan>,
    ) -> Result<Self, AnnotationError> {
        let text = text.into();

        for (index, token) in tokens.iter().enumerate() {
            let in_bounds = token.start <= token.end
                && token.end <= text.len()
                && text.is_char_boundary(token.start)
                && text.is_char_boundary(token.end);
            if !in_bounds {
                return Err(AnnotationError::TokenOutOfBounds {
                    index,
                    start: token.start,
                    end: token.end,
                    len: text.len(),
                });
            }
            if let Some(prev) = index.checked_sub(1).map(|i| &tokens[i]) {
                if prev.end > token.start {
                    return Err(AnnotationError::TokensOutOfOrder {
                        index,
                        start: token.start,
                        prev_end: prev.end,
                    });
                }
            }
        }

        for entity in &entities {
            if entity.start >= entity.end || entity.end > tokens.len() {
                return Err(AnnotationError::EntityOutOfBounds {
                    label: entity.label.clone(),
                    start: entity.start,
                    end: entity.end,
                    len: tokens.len(),
                });
            }
        }

        Ok(Self {
            text,
            tokens,
            entities,
        })
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
            tokens: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn entities(&self) -> &[EntitySpan] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Original-case source text covering tokens `start..end`, including the
    /// whitespace between them.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        if start >= end || end > self.tokens.len() {
            return "";
        }
        &self.text[self.tokens[start].start..self.tokens[end - 1].end]
    }

    /// Lowercase view of tokens `start..end`, joined with the source whitespace.
    pub fn span_lower(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        if start >= end || end > self.tokens.len() {
            return out;
        }
        for idx in start..end {
            if idx > start {
                out.push_str(&self.text[self.tokens[idx - 1].end..self.tokens[idx].start]);
            }
            out.push_str(&self.tokens[idx].lower);
        }
        out
    }
}
