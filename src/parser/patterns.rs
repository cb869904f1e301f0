use std::sync::LazyLock;

use regex::Regex;

static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+[-–—]\s+(.+)$").unwrap());
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•\-*✓✔➤►▶→◆■●○◦‣]+\s*").unwrap());

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b\d+(?:\.\d+)?\s*(?:(?:mm|cm|inches|inch|in|feet|foot|ft|yards|yard|yd|metres|metre|meters|meter|m)\b|["'″′])"#,
    )
    .unwrap()
});
static DIMENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*[x×]\s*\d+(?:\.\d+)?(?:\s*[x×]\s*\d+(?:\.\d+)?)?(?:\s*(?:mm|cm|inches|inch|in|ft|m)\b)?",
    )
    .unwrap()
});
static WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:grams|gram|g|kilograms|kilogram|kg|ounces|ounce|oz|pounds|pound|lbs|lb)\b",
    )
    .unwrap()
});
static CARAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:carats|carat|cts|ct)\b").unwrap()
});
static RING_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsize\s*(\d+(?:\.\d+)?)\b|\b(\d+(?:\.\d+)?)\s*size\b").unwrap()
});

/// Longer keys are prose, not labels.
pub const MAX_KEY_LEN: usize = 50;
pub const MIN_FRAGMENT_LEN: usize = 3;

/// Split a raw fragment into a (key, value) pair. Separators are tried in a
/// fixed order: colon, arrow, dash.
pub fn split_pair(fragment: &str) -> Option<(String, String)> {
    let text = strip_bullet(fragment);
    if text.chars().count() < MIN_FRAGMENT_LEN {
        return None;
    }

    if let Some((k, v)) = text.split_once(':') {
        if let Some(pair) = clean_pair(k, v) {
            return Some(pair);
        }
    }

    for arrow in ["->", "→"] {
        if let Some((k, v)) = text.split_once(arrow) {
            if let Some(pair) = clean_pair(k, v) {
                return Some(pair);
            }
        }
    }

    DASH_RE
        .captures(text)
        .and_then(|caps| clean_pair(&caps[1], &caps[2]))
}

/// Validate an already-labelled pair. Applies the key length guard and the
/// nested "Materials: Type: Value" split.
pub fn clean_pair(key: &str, value: &str) -> Option<(String, String)> {
    let key = collapse_ws(strip_bullet(key));
    let value = collapse_ws(value);
    if key.is_empty() || value.is_empty() || key.chars().count() >= MAX_KEY_LEN {
        return None;
    }

    if key.eq_ignore_ascii_case("materials") {
        if let Some((inner_key, inner_value)) = value.split_once(':') {
            let inner_key = collapse_ws(inner_key);
            let inner_value = collapse_ws(inner_value);
            if !inner_key.is_empty()
                && !inner_value.is_empty()
                && inner_key.chars().count() < MAX_KEY_LEN
            {
                return Some((inner_key, inner_value));
            }
        }
    }

    Some((key, value))
}

pub fn strip_bullet(text: &str) -> &str {
    let text = text.trim();
    match BULLET_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Lines of free text, with inline "•" runs split into separate fragments.
pub fn fragments(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split('•'))
        .map(strip_bullet)
        .filter(|f| !f.is_empty())
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Numeric patterns ──

pub fn size(text: &str) -> Option<String> {
    SIZE_RE
        .find_iter(text)
        .find(|m| !is_stock_count(m.as_str(), &text[m.end()..]))
        .map(|m| m.as_str().trim().to_string())
}

pub fn dimensions(text: &str) -> Option<String> {
    DIMENSION_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn weight(text: &str) -> Option<String> {
    WEIGHT_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn carat_weight(text: &str) -> Option<String> {
    CARAT_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Ring size without the literal word "size".
pub fn ring_size(text: &str) -> Option<String> {
    RING_SIZE_RE
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

// "3 in stock" is a quantity, not a length.
fn is_stock_count(matched: &str, rest: &str) -> bool {
    matched.to_lowercase().ends_with("in") && rest.trim_start().to_lowercase().starts_with("stock")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> Option<(String, String)> {
        Some((k.to_string(), v.to_string()))
    }

    #[test]
    fn separators_in_order() {
        assert_eq!(split_pair("Color: Blue"), pair("Color", "Blue"));
        assert_eq!(split_pair("Shape -> Oval"), pair("Shape", "Oval"));
        assert_eq!(split_pair("Shape → Oval"), pair("Shape", "Oval"));
        assert_eq!(split_pair("Cut - Cabochon"), pair("Cut", "Cabochon"));
    }

    #[test]
    fn colon_beats_dash() {
        assert_eq!(split_pair("Temperature: -5 degrees"), pair("Temperature", "-5 degrees"));
        assert_eq!(split_pair("Style: Hand-made - vintage"), pair("Style", "Hand-made - vintage"));
    }

    #[test]
    fn hyphenated_word_is_not_a_separator() {
        assert_eq!(split_pair("Hand-made ring"), None);
    }

    #[test]
    fn long_key_rejected() {
        let line = "This beautiful ring was crafted in our studio with love and care: enjoy";
        assert_eq!(split_pair(line), None);
        assert_eq!(split_pair("ab"), None);
    }

    #[test]
    fn nested_materials() {
        assert_eq!(split_pair("Materials: Gemstone: Opal"), pair("Gemstone", "Opal"));
        assert_eq!(split_pair("Materials: Sterling silver"), pair("Materials", "Sterling silver"));
    }

    #[test]
    fn bullets_stripped() {
        assert_eq!(split_pair("• Origin: Australia"), pair("Origin", "Australia"));
        assert_eq!(split_pair("✔ Clarity: VS1"), pair("Clarity", "VS1"));
        let frags: Vec<&str> = fragments("• Color: Red • Shape: Oval\n- Cut: Faceted").collect();
        assert_eq!(frags, vec!["Color: Red", "Shape: Oval", "Cut: Faceted"]);
    }

    #[test]
    fn numeric_units_verbatim() {
        assert_eq!(size("Pendant 12.5 MM drop").as_deref(), Some("12.5 MM"));
        assert_eq!(weight("weighs 3.2g total").as_deref(), Some("3.2g"));
        assert_eq!(weight("about 2 kg").as_deref(), Some("2 kg"));
        assert_eq!(carat_weight("a 1.25 ct stone").as_deref(), Some("1.25 ct"));
        assert_eq!(carat_weight("2 Carats of opal").as_deref(), Some("2 Carats"));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(size("8mm beads and 10mm beads").as_deref(), Some("8mm"));
    }

    #[test]
    fn stock_counts_are_not_sizes() {
        assert_eq!(size("Only 3 in stock, chain 18 inches").as_deref(), Some("18 inches"));
    }

    #[test]
    fn dimension_forms() {
        assert_eq!(dimensions("Stone 10 x 8 mm oval").as_deref(), Some("10 x 8 mm"));
        assert_eq!(dimensions("Box 5X4X3cm").as_deref(), Some("5X4X3cm"));
        assert_eq!(dimensions("no numbers here"), None);
    }

    #[test]
    fn ring_size_drops_word() {
        assert_eq!(ring_size("Opal Ring Size 7.5").as_deref(), Some("7.5"));
        assert_eq!(ring_size("fits a 6 size finger").as_deref(), Some("6"));
        assert_eq!(ring_size("size 10mm beads"), None);
    }
}
