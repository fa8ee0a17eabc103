//! Rule-based lemmatizer for the built-in annotator.
//!
//! Covers the verb and noun inflections that show up in CV phrasing. It is not a
//! general English lemmatizer; irregular forms not listed below fall through the
//! suffix rules.

/// Inflected forms whose base cannot be recovered by suffix stripping.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("is", "be"),
    ("are", "be"),
    ("has", "have"),
    ("had", "have"),
    ("won", "win"),
    ("led", "lead"),
    ("wrote", "write"),
    ("written", "write"),
    ("gave", "give"),
    ("given", "give"),
    ("held", "hold"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("taught", "teach"),
    ("sat", "sit"),
    ("reviewed", "review"),
    ("reviewing", "review"),
    ("reviews", "review"),
    ("refereed", "referee"),
    ("earned", "earn"),
    ("awarded", "award"),
    ("chaired", "chair"),
    ("presented", "present"),
    ("received", "receive"),
    ("receiving", "receive"),
    ("served", "serve"),
    ("serving", "serve"),
    ("featured", "feature"),
    ("featuring", "feature"),
    ("published", "publish"),
    ("publishes", "publish"),
];

/// Ordered suffix rewrites; the first rule whose suffix matches wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ating", "ate"),
    ("ated", "ate"),
    ("izing", "ize"),
    ("ized", "ize"),
    ("ging", "ge"),
    ("ged", "ge"),
    ("ving", "ve"),
    ("ved", "ve"),
    ("ies", "y"),
    ("ied", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("sses", "ss"),
    ("ing", ""),
    ("ed", ""),
    ("s", ""),
];

/// Shortest stem a suffix rule may leave behind.
const MIN_STEM: usize = 3;

/// Returns the lemma for an already-lowercased word.
pub(crate) fn lemmatize(lower: &str) -> String {
    if let Some((_, base)) = EXCEPTIONS.iter().find(|(form, _)| *form == lower) {
        return (*base).to_string();
    }

    if !lower.chars().all(|c| c.is_alphabetic()) {
        return lower.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if stem.chars().count() < MIN_STEM {
                continue;
            }
            // "ss" endings (class, press) are not plurals.
            if *suffix == "s" && (stem.ends_with('s') || stem.ends_with('u')) {
                return lower.to_string();
            }
            let mut lemma = format!("{stem}{replacement}");
            if replacement.is_empty() {
                undouble_final_consonant(&mut lemma);
            }
            return lemma;
        }
    }

    lower.to_string()
}

/// running → run, submitted → submit.
fn undouble_final_consonant(stem: &mut String) {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 3 {
        let last = chars[n - 1];
        if last == chars[n - 2] && !"aeioulsz".contains(last) {
            stem.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judging_vocabulary() {
        assert_eq!(lemmatize("judged"), "judge");
        assert_eq!(lemmatize("judging"), "judge");
        assert_eq!(lemmatize("judges"), "judge");
        assert_eq!(lemmatize("evaluated"), "evaluate");
        assert_eq!(lemmatize("evaluating"), "evaluate");
        assert_eq!(lemmatize("evaluates"), "evaluate");
        assert_eq!(lemmatize("reviewed"), "review");
        assert_eq!(lemmatize("reviewing"), "review");
    }

    #[test]
    fn test_plurals() {
        assert_eq!(lemmatize("submissions"), "submission");
        assert_eq!(lemmatize("awards"), "award");
        assert_eq!(lemmatize("studies"), "study");
        assert_eq!(lemmatize("press"), "press");
        assert_eq!(lemmatize("status"), "status");
    }

    #[test]
    fn test_doubled_consonant() {
        assert_eq!(lemmatize("submitted"), "submit");
        assert_eq!(lemmatize("running"), "run");
    }

    #[test]
    fn test_irregular_and_short_words() {
        assert_eq!(lemmatize("won"), "win");
        assert_eq!(lemmatize("led"), "lead");
        assert_eq!(lemmatize("as"), "as");
        assert_eq!(lemmatize("red"), "red");
    }

    #[test]
    fn test_non_alphabetic_passthrough() {
        assert_eq!(lemmatize("$250,000"), "$250,000");
        assert_eq!(lemmatize("2019"), "2019");
    }
}
