//! Preparation of document XML for the template engine.
//!
//! Word processors split typed text into several runs (spell-check marks,
//! formatting changes, revision ids), so a directive such as `{{summary}}` can
//! arrive as `{{` in one run and `summary}}` in another. These passes turn the
//! XML back into something the template engine can parse.

use regex::Regex;
use std::sync::LazyLock;

use super::cleanup::carries_layout;
use super::xml::{leaf_elements, replace_ranges, text_content, unescape};
use crate::error::DocxError;

static BLOCK_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{~?\s*(?:[#/^]|else\b)[^{}]*~?\}\}$")
        .expect("block directive pattern is valid")
});

static BARE_TEXT_WITH_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t>([^<]*\{\{)").expect("text directive pattern is valid")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w:.-]*)[^>]*?(/?)>").expect("tag pattern is valid")
});

static RUN_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<w:t(?:\s[^>]*)?>)[^<]*(</w:t>)").expect("run text pattern is valid")
});

const PARAGRAPH_END: &str = "</w:p>";

/// Run every preparation pass over the document part named `part`
pub fn prepare(part: &str, xml: &str) -> Result<String, DocxError> {
    let merged = merge_split_directives(part, xml)?;
    let promoted = promote_block_directives(&merged);
    Ok(preserve_directive_whitespace(&promoted))
}

/// Remove markup inside `{{ ... }}` so each directive is contiguous text
///
/// Directives are never merged across a paragraph boundary. The dropped
/// markup may only close elements and reopen elements of the same names, as
/// at a run boundary; a directive straddling the edge of a hyperlink or a
/// tracked change is a syntax error.
pub fn merge_split_directives(part: &str, xml: &str) -> Result<String, DocxError> {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let skipped = skip_markup(after);

        if after[skipped..].starts_with('{') {
            let body_start = pos + 1 + skipped + 1;
            if let Some((body, consumed)) = directive_body(&rest[body_start..]) {
                let end = body_start + consumed;
                if !markup_balances(&rest[pos..end]) {
                    return Err(DocxError::TemplateSyntax {
                        part: part.to_string(),
                        message: format!(
                            "directive {{{{{}}}}} crosses the edge of an enclosing element \
                             such as a hyperlink; retype it in one piece",
                            normalize_directive(body.trim())
                        ),
                    });
                }
                out.push_str("{{");
                out.push_str(&normalize_directive(&body));
                out.push_str("}}");
                rest = &rest[end..];
                continue;
            }
        }

        out.push('{');
        rest = after;
    }

    out.push_str(rest);
    Ok(out)
}

/// Whether dropping every tag in `span` leaves the surrounding XML well formed
///
/// Unmatched closing tags must be reopened, in reverse order, by the
/// unmatched opening tags.
fn markup_balances(span: &str) -> bool {
    let mut opened: Vec<&str> = Vec::new();
    let mut closed: Vec<&str> = Vec::new();

    for tag in TAG_RE.captures_iter(span) {
        let group = |i| tag.get(i).map_or("", |m| m.as_str());
        let name = group(2);
        if !group(3).is_empty() {
            continue;
        }

        if group(1).is_empty() {
            opened.push(name);
        } else if opened.last() == Some(&name) {
            opened.pop();
        } else if opened.is_empty() {
            closed.push(name);
        } else {
            return false;
        }
    }

    closed.iter().rev().eq(opened.iter())
}

/// Length of the tags at the start of `s`, stopping at a paragraph end
fn skip_markup(s: &str) -> usize {
    let mut i = 0;
    while s[i..].starts_with('<') && !s[i..].starts_with(PARAGRAPH_END) {
        match s[i..].find('>') {
            Some(close) => i += close + 1,
            None => break,
        }
    }
    i
}

/// Text of a directive body up to its closing braces, with markup dropped
///
/// Returns the body and the number of bytes consumed, including the braces.
fn directive_body(s: &str) -> Option<(String, usize)> {
    let mut body = String::new();
    let mut i = 0;

    while i < s.len() {
        let rest = &s[i..];
        if rest.starts_with(PARAGRAPH_END) {
            return None;
        }
        if rest.starts_with('<') {
            i += rest.find('>')? + 1;
            continue;
        }
        if rest.starts_with('}') {
            let next = i + 1 + skip_markup(&s[i + 1..]);
            if s[next..].starts_with('}') {
                return Some((body, next + 1));
            }
        }
        let ch = rest.chars().next()?;
        body.push(ch);
        i += ch.len_utf8();
    }

    None
}

/// Decode entities and typographic quotes inside a directive
fn normalize_directive(body: &str) -> String {
    unescape(body)
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Replace a row or paragraph holding only a block directive by the directive
///
/// This lets `{{#each}}` ... `{{/each}}` written on their own lines repeat the
/// paragraphs or table rows between them, instead of leaving the directive
/// paragraphs behind as empty lines.
pub fn promote_block_directives(xml: &str) -> String {
    let rows = promote_elements(xml, "w:tr");
    promote_elements(&rows, "w:p")
}

fn promote_elements(xml: &str, name: &str) -> String {
    let edits: Vec<_> = leaf_elements(xml, name)
        .into_iter()
        .filter_map(|range| {
            let element = &xml[range.clone()];
            let text = text_content(element);
            let text = text.trim();
            if is_block_directive(text) {
                Some((range, promoted(element, text)))
            } else {
                None
            }
        })
        .collect();

    if edits.is_empty() {
        xml.to_string()
    } else {
        replace_ranges(xml, edits)
    }
}

/// Replacement for an element whose whole text is the block directive
///
/// An element carrying section properties, breaks or embedded content stays,
/// with its text cleared, on the outer side of the directive so it is emitted
/// once rather than dropped or repeated.
fn promoted(element: &str, directive: &str) -> String {
    if !carries_layout(element) {
        return directive.to_string();
    }

    let kept = RUN_TEXT_RE.replace_all(element, "${1}${2}");
    let marker = directive
        .trim_start_matches('{')
        .trim_start_matches('~')
        .trim_start();

    if marker.starts_with('#') || marker.starts_with('^') {
        format!("{}{}", kept, directive)
    } else if marker.starts_with('/') {
        format!("{}{}", directive, kept)
    } else {
        // else: one copy in each branch
        format!("{}{}{}", kept, directive, kept)
    }
}

/// Whether `text` is exactly one opening, closing or else block directive
pub fn is_block_directive(text: &str) -> bool {
    BLOCK_DIRECTIVE_RE.is_match(text)
}

/// Keep leading and trailing spaces of substituted values
fn preserve_directive_whitespace(xml: &str) -> String {
    BARE_TEXT_WITH_DIRECTIVE_RE
        .replace_all(xml, r#"<w:t xml:space="preserve">${1}"#)
        .into_owned()
}
