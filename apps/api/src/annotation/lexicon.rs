//! `LexiconAnnotator`, the built-in dependency-light annotator.
//!
//! Tokenizes on Unicode word boundaries and tags MONEY, WORK_OF_ART,
//! ORGANIZATION and DATE entities with lexicon and shape rules. Good enough to
//! drive the rule engine on plain CV text; swap in an NLP service behind
//! `Annotator` when higher-recall entity recognition is needed.

use std::collections::HashSet;

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::lemma::lemmatize;
use super::{AnnotatedDocument, AnnotationError, Annotator, EntityLabel, EntitySpan, Token};

const CURRENCY_SYMBOLS: &[&str] = &["$", "€", "£", "¥"];

const CURRENCY_WORDS: &[&str] = &[
    "usd", "eur", "gbp", "jpy", "chf", "cad", "aud", "dollars", "dollar", "euros", "euro",
    "pounds", "pound",
];

const MAGNITUDE_WORDS: &[&str] = &["thousand", "million", "billion", "k", "m", "mm", "bn"];

/// Words that mark a capitalized run as an organisation name.
const ORG_CUES: &[&str] = &[
    "university",
    "institute",
    "institution",
    "society",
    "association",
    "academy",
    "foundation",
    "council",
    "laboratory",
    "laboratories",
    "lab",
    "labs",
    "inc",
    "corp",
    "corporation",
    "company",
    "ltd",
    "llc",
    "gmbh",
    "times",
    "journal",
    "news",
    "press",
    "magazine",
    "post",
    "tribune",
    "gazette",
    "herald",
    "review",
    "group",
    "agency",
    "bank",
    "college",
    "school",
    "center",
    "centre",
    "department",
    "ministry",
    "hospital",
    "museum",
    "federation",
    "union",
    "organization",
    "organisation",
    "commission",
    "board",
    "network",
    "media",
];

/// Single-word organisations and outlets common in CVs.
const KNOWN_ORGS: &[&str] = &[
    "nature",
    "science",
    "forbes",
    "bloomberg",
    "reuters",
    "techcrunch",
    "wired",
    "google",
    "microsoft",
    "amazon",
    "apple",
    "meta",
    "nvidia",
    "openai",
    "deepmind",
    "nasa",
    "cern",
    "harvard",
    "stanford",
    "oxford",
    "cambridge",
];

/// All-caps tokens that are not organisations.
const ACRONYM_STOPLIST: &[&str] = &[
    "usd", "eur", "gbp", "jpy", "chf", "cad", "aud", "cv", "phd", "mba", "bsc", "msc", "ba",
    "ma", "ceo", "cto", "cfo", "coo", "vp", "ai", "ml", "us", "usa", "uk", "eu", "i",
];

/// Lowercase words allowed inside a capitalized run when followed by another
/// capitalized word ("University of Toronto", "Research & Development Board").
const RUN_CONNECTORS: &[&str] = &["of", "for", "and", "&", "the", "de"];

const MAX_TITLE_TOKENS: usize = 20;
const MIN_TITLE_TOKENS: usize = 2;

pub struct LexiconAnnotator {
    org_cues: HashSet<&'static str>,
    known_orgs: HashSet<&'static str>,
    acronym_stoplist: HashSet<&'static str>,
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnnotator {
    pub fn new() -> Self {
        Self {
            org_cues: ORG_CUES.iter().copied().collect(),
            known_orgs: KNOWN_ORGS.iter().copied().collect(),
            acronym_stoplist: ACRONYM_STOPLIST.iter().copied().collect(),
        }
    }

    fn tag_money(&self, tokens: &[Token], labels: &mut [Option<EntityLabel>]) {
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            let currency_prefixed = CURRENCY_SYMBOLS.iter().any(|s| tok.text.starts_with(s))
                && tok.text.chars().any(|c| c.is_ascii_digit());

            let end = if currency_prefixed {
                let mut end = i + 1;
                if end < tokens.len() && MAGNITUDE_WORDS.contains(&tokens[end].lower.as_str()) {
                    end += 1;
                }
                Some(end)
            } else if starts_with_digit(&tok.text) {
                let mut end = i + 1;
                if end < tokens.len() && MAGNITUDE_WORDS.contains(&tokens[end].lower.as_str()) {
                    end += 1;
                }
                if end < tokens.len() && CURRENCY_WORDS.contains(&tokens[end].lower.as_str()) {
                    Some(end + 1)
                } else {
                    None
                }
            } else {
                None
            };

            match end {
                Some(end) => {
                    label_range(labels, i, end, EntityLabel::Money);
                    i = end;
                }
                None => i += 1,
            }
        }
    }

    fn tag_titles(&self, tokens: &[Token], labels: &mut [Option<EntityLabel>]) {
        let mut i = 0;
        while i < tokens.len() {
            if !is_open_quote(&tokens[i].text) {
                i += 1;
                continue;
            }
            let limit = (i + MAX_TITLE_TOKENS + 2).min(tokens.len());
            let close = (i + 1..limit).find(|&j| is_close_quote(&tokens[j].text));
            let Some(close) = close else {
                i += 1;
                continue;
            };

            let inner = i + 1..close;
            let inner_len = inner.len();
            let free = inner.clone().all(|j| labels[j].is_none());
            let capitalized = inner.clone().any(|j| is_capitalized(&tokens[j].text));
            if (MIN_TITLE_TOKENS..=MAX_TITLE_TOKENS).contains(&inner_len) && free && capitalized {
                label_range(labels, inner.start, inner.end, EntityLabel::WorkOfArt);
            }
            i = close + 1;
        }
    }

    fn tag_organizations(&self, tokens: &[Token], labels: &mut [Option<EntityLabel>]) {
        let mut i = 0;
        while i < tokens.len() {
            if labels[i].is_some() || !is_capitalized(&tokens[i].text) {
                i += 1;
                continue;
            }

            let mut end = i + 1;
            loop {
                if end < tokens.len() && labels[end].is_none() && is_capitalized(&tokens[end].text)
                {
                    end += 1;
                } else if end + 1 < tokens.len()
                    && RUN_CONNECTORS.contains(&tokens[end].lower.as_str())
                    && labels[end].is_none()
                    && labels[end + 1].is_none()
                    && is_capitalized(&tokens[end + 1].text)
                {
                    end += 2;
                } else {
                    break;
                }
            }

            if self.run_is_organization(&tokens[i..end]) {
                label_range(labels, i, end, EntityLabel::Organization);
            } else {
                self.tag_org_fragments(tokens, labels, i, end);
            }
            i = end;
        }
    }

    fn run_is_organization(&self, run: &[Token]) -> bool {
        if run.iter().any(|t| self.org_cues.contains(t.lower.as_str())) {
            return true;
        }
        run.iter().all(|t| self.is_org_acronym(t))
            || (run.len() == 1 && self.known_orgs.contains(run[0].lower.as_str()))
    }

    /// Tags acronym sequences and known single-word organisations inside a run
    /// that does not qualify as a whole ("Program Committee ACM SIGMOD").
    fn tag_org_fragments(
        &self,
        tokens: &[Token],
        labels: &mut [Option<EntityLabel>],
        start: usize,
        end: usize,
    ) {
        let mut j = start;
        while j < end {
            if self.is_org_acronym(&tokens[j]) {
                let mut k = j + 1;
                while k < end && self.is_org_acronym(&tokens[k]) {
                    k += 1;
                }
                label_range(labels, j, k, EntityLabel::Organization);
                j = k;
            } else if self.known_orgs.contains(tokens[j].lower.as_str()) {
                label_range(labels, j, j + 1, EntityLabel::Organization);
                j += 1;
            } else {
                j += 1;
            }
        }
    }

    fn is_org_acronym(&self, token: &Token) -> bool {
        let letters = token.text.chars().filter(|c| c.is_alphabetic()).count();
        letters >= 2
            && token.text.chars().count() <= 8
            && token
                .text
                .chars()
                .all(|c| c.is_uppercase() || c.is_ascii_digit())
            && !self.acronym_stoplist.contains(token.lower.as_str())
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError> {
        let tokens = tokenize(text);
        let mut labels: Vec<Option<EntityLabel>> = vec![None; tokens.len()];

        self.tag_money(&tokens, &mut labels);
        self.tag_titles(&tokens, &mut labels);
        self.tag_organizations(&tokens, &mut labels);
        tag_years(&tokens, &mut labels);

        let mut tokens = tokens;
        for (token, label) in tokens.iter_mut().zip(labels) {
            token.entity = label;
        }
        let entities = collect_entities(text, &tokens);

        debug!(
            tokens = tokens.len(),
            entities = entities.len(),
            "lexicon annotation complete"
        );

        AnnotatedDocument::new(text, tokens, entities)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenization
// ────────────────────────────────────────────────────────────────────────────

fn tokenize(text: &str) -> Vec<Token> {
    let segments: Vec<(usize, &str)> = text
        .split_word_bound_indices()
        .filter(|(_, seg)| !seg.chars().all(char::is_whitespace))
        .collect();

    let mut spans: Vec<(usize, usize)> = Vec::with_capacity(segments.len());
    let mut idx = 0;
    while idx < segments.len() {
        let (start, seg) = segments[idx];
        let mut end = start + seg.len();
        if CURRENCY_SYMBOLS.contains(&seg) {
            if let Some(&(next_start, next)) = segments.get(idx + 1) {
                if next_start == end && starts_with_digit(next) {
                    end = next_start + next.len();
                    idx += 1;
                }
            }
        }
        spans.push((start, end));
        idx += 1;
    }

    spans
        .into_iter()
        .map(|(start, end)| {
            let raw = &text[start..end];
            let lower = raw.to_lowercase();
            let lemma = lemmatize(&lower);
            Token {
                text: raw.to_string(),
                lower,
                lemma,
                entity: None,
                start,
                end,
            }
        })
        .collect()
}

fn tag_years(tokens: &[Token], labels: &mut [Option<EntityLabel>]) {
    for (idx, token) in tokens.iter().enumerate() {
        if labels[idx].is_some() || token.text.len() != 4 {
            continue;
        }
        if let Ok(year) = token.text.parse::<u16>() {
            if (1900..=2099).contains(&year) {
                labels[idx] = Some(EntityLabel::Date);
            }
        }
    }
}

/// Groups consecutive tokens with the same label into entity spans.
fn collect_entities(text: &str, tokens: &[Token]) -> Vec<EntitySpan> {
    let mut entities = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let Some(label) = tokens[i].entity.clone() else {
            i += 1;
            continue;
        };
        let mut end = i + 1;
        while end < tokens.len() && tokens[end].entity.as_ref() == Some(&label) {
            end += 1;
        }
        entities.push(EntitySpan {
            text: text[tokens[i].start..tokens[end - 1].end].to_string(),
            label,
            start: i,
            end,
        });
        i = end;
    }
    entities
}

fn label_range(labels: &mut [Option<EntityLabel>], start: usize, end: usize, label: EntityLabel) {
    for slot in &mut labels[start..end] {
        *slot = Some(label.clone());
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_capitalized(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_open_quote(s: &str) -> bool {
    s == "\"" || s == "\u{201C}"
}

fn is_close_quote(s: &str) -> bool {
    s == "\"" || s == "\u{201D}"
}
