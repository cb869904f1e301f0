use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::{Candidate, SourceRegion};
use crate::parser::patterns::clean_pair;

static ITEM_ATTRIBUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""itemAttributes"\s*:\s*\["#).unwrap());

#[derive(Deserialize)]
struct EmbeddedAttribute {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Name/value pairs from an `"itemAttributes": [...]` array embedded in the
/// page source. Counts as structured details.
pub fn extract(document_text: &str) -> Vec<Candidate> {
    let Some(m) = ITEM_ATTRIBUTES_RE.find(document_text) else {
        return Vec::new();
    };
    // start at the opening bracket; trailing script text is ignored
    let json = &document_text[m.end() - 1..];
    let mut stream = serde_json::Deserializer::from_str(json).into_iter::<Vec<EmbeddedAttribute>>();
    let attributes = match stream.next() {
        Some(Ok(attrs)) => attrs,
        Some(Err(e)) => {
            debug!(error = %e, "unparseable itemAttributes array");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    attributes
        .into_iter()
        .filter_map(|a| {
            let value = value_text(&a.value)?;
            clean_pair(&a.name, &value)
        })
        .map(|(k, v)| Candidate::new(k, v, SourceRegion::StructuredDetails))
        .collect()
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ebay_item_attributes() {
        let html = r#"<script>var s = {"itemAttributes": [{"name":"Gemstone","value":"Opal"},
            {"name":"Color","value":["White","Blue"]},{"name":"Total Carat Weight","value":2.5},
            {"name":"Empty","value":null}], "seller": {"id": 1}};</script>"#;
        let c = extract(html);
        let got: Vec<(&str, &str)> = c.iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
        assert_eq!(
            got,
            vec![("Gemstone", "Opal"), ("Color", "White, Blue"), ("Total Carat Weight", "2.5")]
        );
    }

    #[test]
    fn absent_or_broken() {
        assert!(extract("no json here").is_empty());
        assert!(extract(r#""itemAttributes": [{"name": "#).is_empty());
    }
}
