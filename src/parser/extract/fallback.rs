use regex::Regex;
use tracing::warn;

use super::{has_attribute, Candidate, SourceRegion};
use crate::parser::attrs::AttributeMap;

const MIN_LINE_LEN: usize = 5;
const MAX_LINE_LEN: usize = 500;

/// Precompiled "Attribute <sep> Value" patterns for each critical attribute,
/// separators in the order ":", "-", "→", " is ", "=".
pub struct FallbackMatcher {
    patterns: Vec<(String, Vec<Regex>)>,
}

impl FallbackMatcher {
    pub fn new(critical_attributes: &[String]) -> Self {
        let patterns = critical_attributes
            .iter()
            .map(|attr| (attr.clone(), separator_patterns(attr)))
            .collect();
        Self { patterns }
    }

    /// Scan every page line for critical attributes still missing. Presence
    /// is re-checked before each attribute so one hit can satisfy its
    /// variants.
    pub fn extract(&self, document_text: &str, attrs: &AttributeMap) -> Vec<Candidate> {
        let lines: Vec<&str> = document_text
            .lines()
            .map(str::trim)
            .filter(|l| (MIN_LINE_LEN..=MAX_LINE_LEN).contains(&l.chars().count()))
            .collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let mut keys: Vec<String> = attrs.keys().map(str::to_string).collect();
        let mut found = Vec::new();

        for (attr, patterns) in &self.patterns {
            if has_attribute(keys.iter().map(String::as_str), attr) {
                continue;
            }
            let hit = lines.iter().find_map(|line| {
                patterns.iter().find_map(|re| {
                    re.captures(line)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().trim())
                        .filter(|v| !v.is_empty())
                })
            });
            if let Some(value) = hit {
                keys.push(attr.clone());
                found.push(Candidate::new(attr.as_str(), value, SourceRegion::AggregateFallback));
            }
        }

        found
    }
}

fn separator_patterns(attr: &str) -> Vec<Regex> {
    let a = regex::escape(attr);
    [
        format!(r"(?i)\b{a}\s*:\s*(.+)"),
        format!(r"(?i)\b{a}\s*-\s*(.+)"),
        format!(r"(?i)\b{a}\s*→\s*(.+)"),
        format!(r"(?i)\b{a}\s+is\s+([^.]+)"),
        format!(r"(?i)\b{a}\s*=\s*(.+)"),
    ]
    .iter()
    .filter_map(|p| match Regex::new(p) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(attribute = attr, error = %e, "skipping fallback pattern");
            None
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(attrs: &[&str]) -> FallbackMatcher {
        let owned: Vec<String> = attrs.iter().map(|a| a.to_string()).collect();
        FallbackMatcher::new(&owned)
    }

    #[test]
    fn separator_order_within_line() {
        let m = matcher(&["Shape"]);
        let c = m.extract("Shape = round\nShape: oval", &AttributeMap::new());
        // line order first, then separator order
        assert_eq!(c[0].value, "round");
    }

    #[test]
    fn one_hit_satisfies_variants() {
        let m = matcher(&["Stone Cut", "Cut"]);
        let c = m.extract("Stone cut: brilliant\nCut - emerald", &AttributeMap::new());
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].key, "Stone Cut");
        assert_eq!(c[0].source, SourceRegion::AggregateFallback);
    }

    #[test]
    fn present_attributes_skipped() {
        let m = matcher(&["Color", "Treatment"]);
        let mut attrs = AttributeMap::new();
        attrs.insert_if_absent("Gemstone Color", "Blue");
        let c = m.extract("Color: red\nTreatment is heated. Stunning", &attrs);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].key, "Treatment");
        assert_eq!(c[0].value, "heated");
    }

    #[test]
    fn line_length_bounds() {
        let m = matcher(&["Cut"]);
        let long = format!("Cut: {}", "x".repeat(600));
        assert!(m.extract(&long, &AttributeMap::new()).is_empty());
        assert!(m.extract("Cut", &AttributeMap::new()).is_empty());
    }
}
