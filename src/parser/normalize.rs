use indexmap::IndexMap;

use super::attrs::AttributeMap;

const DIMENSION_WORDS: &[&str] = &["length", "width", "depth", "height"];
const DIMENSIONS: &str = "Dimensions";
const SIZE: &str = "Size";

/// Field combination, then aliases, then field combination again so an alias
/// that produces "Dimensions" still respects the Size rule. The result is a
/// fixed point: normalizing it again changes nothing.
pub fn normalize(attrs: &AttributeMap, aliases: &IndexMap<String, String>) -> AttributeMap {
    let mut out = attrs.clone();
    combine_dimensions(&mut out);
    apply_aliases(&mut out, aliases);
    combine_dimensions(&mut out);
    out
}

fn is_dimension_field(key: &str) -> bool {
    let key = key.to_lowercase();
    DIMENSION_WORDS.iter().any(|w| key.contains(w))
}

/// True when a measurement field or "Dimensions" is already present. A
/// later "Size" would erase them during normalization.
pub fn has_dimensions(attrs: &AttributeMap) -> bool {
    attrs.keys().any(|k| k == DIMENSIONS || is_dimension_field(k))
}

/// Size excludes every other measurement field. Otherwise two or more of
/// Length/Width/Depth/Height collapse into one "Dimensions" entry.
fn combine_dimensions(attrs: &mut AttributeMap) {
    let fields: Vec<(String, String)> = attrs
        .text_entries()
        .filter(|(k, _)| is_dimension_field(k))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if attrs.contains_key(SIZE) {
        for (k, _) in &fields {
            attrs.remove(k);
        }
        attrs.remove(DIMENSIONS);
        return;
    }

    if fields.len() < 2 {
        return;
    }

    if !attrs.contains_key(DIMENSIONS) {
        let combined = fields
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        let first = &fields[0].0;
        attrs.rename(first, DIMENSIONS);
        attrs.set(DIMENSIONS, &combined);
    }
    for (k, _) in &fields {
        attrs.remove(k);
    }
}

/// Canonical name wins when both spellings are present.
fn apply_aliases(attrs: &mut AttributeMap, aliases: &IndexMap<String, String>) {
    for (variant, canonical) in aliases {
        if !attrs.contains_key(variant) {
            continue;
        }
        if attrs.contains_key(canonical) {
            attrs.remove(variant);
        } else {
            attrs.rename(variant, canonical);
        }
    }
}

// ── Tests ──
