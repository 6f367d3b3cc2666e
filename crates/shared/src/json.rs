use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced json pattern is valid")
});

/// Pulls the JSON payload out of free-form model output.
///
/// Models wrap JSON in markdown fences or prefix it with prose. A fenced
/// ```json block wins, then the span from the first opening bracket to the
/// matching last closing one, then the raw text.
pub fn extract_json(raw: &str) -> &str {
    if let Some(body) = FENCED_JSON.captures(raw).and_then(|c| c.get(1)) {
        if !body.as_str().is_empty() {
            return body.as_str();
        }
    }

    let first_object = raw.find('{');
    let first_array = raw.find('[');
    let (open, close) = match (first_object, first_array) {
        (Some(o), Some(a)) if a < o => (a, ']'),
        (Some(o), _) => (o, '}'),
        (None, Some(a)) => (a, ']'),
        (None, None) => return raw,
    };

    match raw.rfind(close) {
        Some(end) if end > open => &raw[open..=end],
        _ => raw,
    }
}

pub fn parse_generated<T: DeserializeOwned>(raw: &str) -> crate::Result<T> {
    Ok(serde_json::from_str(extract_json(raw))?)
}
