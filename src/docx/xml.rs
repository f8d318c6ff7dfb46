//! Minimal WordprocessingML scanning helpers.
//!
//! Document parts are treated as text: elements are located by scanning tags,
//! which is enough to find paragraphs, rows and runs without building a DOM.

use std::ops::Range;

/// Byte ranges of every `name` element in `xml`, sorted by start
///
/// Each range spans from the opening `<` to the closing `>` of the end tag
/// (or of the self-closing tag). Unbalanced end tags are ignored.
pub fn elements(xml: &str, name: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0;

    while let Some(offset) = xml[pos..].find('<') {
        let start = pos + offset;
        let Some(close) = xml[start..].find('>') else {
            break;
        };
        let end = start + close + 1;
        let tag = &xml[start + 1..end - 1];
        pos = end;

        if tag.starts_with('?') || tag.starts_with('!') {
            continue;
        }

        if let Some(closing) = tag.strip_prefix('/') {
            if closing.trim_end() == name {
                if let Some(open_start) = open.pop() {
                    found.push(open_start..end);
                }
            }
            continue;
        }

        if tag_name(tag) != name {
            continue;
        }

        if tag.ends_with('/') {
            found.push(start..end);
        } else {
            open.push(start);
        }
    }

    found.sort_by_key(|r| r.start);
    found
}

/// Ranges of `name` elements that contain no nested `name` element
pub fn leaf_elements(xml: &str, name: &str) -> Vec<Range<usize>> {
    let all = elements(xml, name);
    all.iter()
        .enumerate()
        .filter(|(i, range)| match all.get(i + 1) {
            Some(next) => next.start >= range.end,
            None => true,
        })
        .map(|(_, range)| range.clone())
        .collect()
}

/// Visible text of a fragment: the unescaped contents of its `w:t` elements
pub fn text_content(fragment: &str) -> String {
    elements(fragment, "w:t")
        .into_iter()
        .map(|range| unescape(inner(&fragment[range])))
        .collect()
}

/// Content between an element's start and end tags
fn inner(element: &str) -> &str {
    if element.ends_with("/>") && !element.contains("</") {
        return "";
    }
    let start = element.find('>').map(|i| i + 1).unwrap_or(0);
    let end = element.rfind("</").unwrap_or(element.len());
    if start <= end {
        &element[start..end]
    } else {
        ""
    }
}

/// Name of a tag from its contents between `<` and `>`
fn tag_name(tag: &str) -> &str {
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Replace byte ranges of `xml`; ranges must not overlap
pub fn replace_ranges(xml: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&xml[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&xml[cursor..]);
    out
}

/// Escape text for use in element content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Decode the predefined XML entities and numeric character references
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        match after.find(';').and_then(|semi| decode_entity(&after[1..semi]).map(|c| (c, semi))) {
            Some((decoded, semi)) => {
                out.push(decoded);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
