//! Post-render removal of empty paragraphs.
//!
//! Conditionals and loops that produce nothing leave blank paragraphs behind.
//! A paragraph is dropped when it has no text and carries nothing else that
//! is visible or structural.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::xml::{leaf_elements, replace_ranges, text_content};

static LAYOUT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:br\b[^>]*\bw:type="(?:page|column)""#).expect("break pattern is valid")
});

/// Markup that makes an otherwise text-free paragraph worth keeping
const KEEP_MARKERS: &[&str] = &[
    "<w:sectPr",
    "<w:drawing",
    "<w:pict",
    "<w:object",
    "<w:sym",
    "<w:fldChar",
    "<w:fldSimple",
    "<w:instrText",
    "<w:separator",
    "<w:continuationSeparator",
    "<w:footnoteRef",
    "<w:endnoteRef",
    "<w:footnoteReference",
    "<w:endnoteReference",
    "<m:oMath",
];

/// Containers whose last paragraph must stay for the document to remain valid
const CONTAINER_ENDS: &[&str] = &[
    "</w:tc>",
    "</w:hdr>",
    "</w:ftr>",
    "</w:footnote>",
    "</w:endnote>",
    "</w:txbxContent>",
    "</w:comment>",
];

/// Drop every effectively empty paragraph from a rendered part
pub fn remove_empty_paragraphs(xml: &str) -> String {
    let edits: Vec<_> = leaf_elements(xml, "w:p")
        .into_iter()
        .filter(|range| {
            is_effectively_empty(&xml[range.clone()]) && !closes_container(&xml[range.end..])
        })
        .map(|range| (range, String::new()))
        .collect();

    if edits.is_empty() {
        return xml.to_string();
    }

    debug!("Removing {} empty paragraphs", edits.len());
    replace_ranges(xml, edits)
}

/// No text, no section properties, no page or column break, no embedded content
pub fn is_effectively_empty(paragraph: &str) -> bool {
    text_content(paragraph).trim().is_empty() && !carries_layout(paragraph)
}

/// Whether `xml` holds section properties, a layout break or embedded content
pub fn carries_layout(xml: &str) -> bool {
    LAYOUT_BREAK_RE.is_match(xml) || KEEP_MARKERS.iter().any(|marker| xml.contains(marker))
}

fn closes_container(after: &str) -> bool {
    let after = after.trim_start();
    CONTAINER_ENDS.iter().any(|end| after.starts_with(end))
}
