//! DOCX body text: the `<w:t>` runs of `word/document.xml`, one line per
//! paragraph.

use std::io::{Cursor, Read};

use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

pub(super) fn extract_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip container: {e}"))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| format!("missing {DOCUMENT_PART}: {e}"))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| format!("unreadable {DOCUMENT_PART}: {e}"))?;

    body_text(&xml)
}

/// Walks the WordprocessingML markup and keeps run text. Tabs and breaks
/// inside a run map to `\t` and `\n`; every closed paragraph ends a line.
/// `<w:tab>` elements under `<w:tabs>` are tab-stop definitions, not content.
fn body_text(xml: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut in_run_text = false;
    let mut run_depth = 0usize;
    let mut tab_stops_depth = 0usize;
    let mut rest = xml;

    while let Some(lt) = rest.find('<') {
        if in_run_text {
            out.push_str(&unescape(&rest[..lt]));
        }
        let after = &rest[lt + 1..];
        let gt = tag_end(after).ok_or_else(|| "unterminated tag in document body".to_string())?;
        let tag = &after[..gt];
        rest = &after[gt + 1..];

        let closing = tag.starts_with('/');
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();
        let in_run = run_depth > 0 && tab_stops_depth == 0;

        match (name, closing) {
            ("w:r", false) if !self_closing => run_depth += 1,
            ("w:r", true) => run_depth = run_depth.saturating_sub(1),
            ("w:tabs", false) if !self_closing => tab_stops_depth += 1,
            ("w:tabs", true) => tab_stops_depth = tab_stops_depth.saturating_sub(1),
            ("w:t", false) => in_run_text = in_run && !self_closing,
            ("w:t", true) => in_run_text = false,
            ("w:tab", false) if in_run => out.push('\t'),
            ("w:br" | "w:cr", false) if in_run => out.push('\n'),
            ("w:p", true) => out.push('\n'),
            _ => {}
        }
    }

    Ok(out.trim_end_matches('\n').to_string())
}

/// Offset of the `>` closing a tag, skipping any inside quoted attribute values.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (None, '>') => return Some(i),
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            _ => {}
        }
    }
    None
}

/// Resolves the predefined XML entities and numeric character references.
/// Unknown references are kept verbatim.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let Some(semi) = after.find(';') else {
            out.push_str(after);
            return out;
        };
        let entity = &after[1..semi];
        match resolve_entity(entity) {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }

    out.push_str(rest);
    out
}

fn resolve_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let hex = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"));
            let code = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
