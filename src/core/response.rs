//! Parsing of model output into JSON data.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::CvTailorError;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").expect("fence pattern is valid")
});

/// Parse the model's reply as JSON
///
/// Models occasionally wrap JSON in a Markdown fence despite instructions, so
/// a fenced or backtick-wrapped reply is unwrapped and parsed again.
pub fn parse_model_json(raw: &str) -> Result<Value, CvTailorError> {
    let first_error = match serde_json::from_str(raw) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let unwrapped = strip_code_fence(raw);
    if unwrapped != raw.trim() {
        debug!("Retrying JSON parse without code fence");
        if let Ok(value) = serde_json::from_str(&unwrapped) {
            return Ok(value);
        }
    }

    Err(CvTailorError::InvalidModelJson {
        raw: raw.to_string(),
        source: first_error,
    })
}

/// Remove a surrounding Markdown code fence or stray backticks
fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(caps) = FENCE_RE.captures(trimmed) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim().to_string();
        }
    }

    trimmed.trim_matches('`').trim().to_string()
}

/// Serialize JSON compactly, keeping non-ASCII characters as-is
pub fn to_compact_json(value: &Value) -> Result<String, CvTailorError> {
    serde_json::to_string(value).map_err(|e| CvTailorError::Io(std::io::Error::other(e)))
}
