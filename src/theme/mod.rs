pub mod color;
pub mod kb;

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::parser::attrs::AttributeMap;
use color::normalize_color;
use kb::{GemstoneEntry, KnowledgeBase};

const COLOR_FIELDS: &[&str] = &[
    "Color", "Gemstone Color", "Stone Color", "Main Stone Color", "Primary Color",
    "Dominant Color", "Gem Color", "Crystal Color",
];
const FAMILY_FIELDS: &[&str] = &[
    "Gemstone", "Gemstone Name", "Gem Type", "Gemstone Type", "Stone Type", "Main Stone",
    "Stone", "Gem", "Crystal Type", "Material", "Mineral",
];
const EFFECT_FIELDS: &[&str] = &[
    "Effect", "Optical Effect", "Special Properties", "Phenomena", "Visual Effect",
    "Appearance", "Luster",
];

const COLOR_CHANGE_EFFECTS: &[&str] = &["color change", "alexandrite effect", "color shift", "pleochroism"];
const MULTICOLOR_EFFECTS: &[&str] = &[
    "play of color", "labradorescence", "opalescence", "adularescence", "iridescence", "rainbow",
];
const TOURMALINE: &str = "tourmaline";
const TOURMALINE_NAMES: &[&str] = &[
    "tourmaline", "tourmuline", "rubellite", "indicolite", "verdelite", "paraiba", "dravite", "schorl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionMethod {
    #[serde(rename = "color+family")]
    ColorFamily,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "special-effect")]
    SpecialEffect,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "color-category")]
    ColorCategory,
    #[serde(rename = "none")]
    None,
}

impl DetectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMethod::ColorFamily => "color+family",
            DetectionMethod::Color => "color",
            DetectionMethod::SpecialEffect => "special-effect",
            DetectionMethod::Name => "name",
            DetectionMethod::ColorCategory => "color-category",
            DetectionMethod::None => "none",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table palette chosen for a listing, with what it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorTheme {
    pub name: String,
    pub primary_color: String,
    pub complementary_color: String,
    pub header_bg: String,
    pub row_bg: String,
    pub alt_row_bg: String,
    pub text_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_gemstone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_metal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_color: Option<String>,
    pub detection_method: DetectionMethod,
}

impl ColorTheme {
    fn from_entry(entry: &GemstoneEntry, method: DetectionMethod) -> Self {
        Self {
            name: entry.name.clone(),
            primary_color: entry.primary_color.clone(),
            complementary_color: entry.complementary_color.clone(),
            header_bg: entry.header_bg.clone(),
            row_bg: entry.row_bg.clone(),
            alt_row_bg: entry.alt_row_bg.clone(),
            text_color: entry.text_color.clone(),
            detected_gemstone: None,
            detected_metal: None,
            detected_color: None,
            detection_method: method,
        }
    }

    fn gemstone(key: &str, entry: &GemstoneEntry, method: DetectionMethod) -> Self {
        Self {
            detected_gemstone: Some(key.to_string()),
            ..Self::from_entry(entry, method)
        }
    }
}

/// Knowledge base plus word-boundary patterns compiled once for it.
pub struct ThemeMatcher {
    kb: KnowledgeBase,
    gem_patterns: Vec<(String, Regex)>,
    metal_patterns: Vec<(String, Regex)>,
    family_patterns: Vec<(String, Regex)>,
}

fn word_patterns<'a>(names: impl Iterator<Item = &'a String>, plural: bool) -> Vec<(String, Regex)> {
    let suffix = if plural { "s?" } else { "" };
    names
        .filter_map(|name| {
            let pattern = format!(r"(?i)\b{}{}\b", regex::escape(name), suffix);
            match Regex::new(&pattern) {
                Ok(re) => Some((name.clone(), re)),
                Err(e) => {
                    warn!(name = %name, error = %e, "skipping knowledge base name");
                    None
                }
            }
        })
        .collect()
}

impl ThemeMatcher {
    pub fn new(kb: KnowledgeBase) -> Self {
        let gem_patterns = word_patterns(kb.gemstones.keys(), true);
        let metal_patterns = word_patterns(kb.metals.keys(), false);
        let family_patterns = word_patterns(kb.varieties.keys(), true);
        Self {
            kb,
            gem_patterns,
            metal_patterns,
            family_patterns,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn default_theme(&self) -> ColorTheme {
        ColorTheme::from_entry(&self.kb.default_theme, DetectionMethod::None)
    }

    /// Cascade: color+family, color, special effects, gemstone name, metal
    /// name, color-category representative, default.
    pub fn detect(&self, attrs: &AttributeMap) -> ColorTheme {
        let color = first_present(attrs, COLOR_FIELDS);
        let family = first_present(attrs, FAMILY_FIELDS);
        let effects: Vec<String> = EFFECT_FIELDS
            .iter()
            .filter_map(|f| attrs.get_str(f))
            .map(str::to_lowercase)
            .collect();

        if let (Some(color), Some(family)) = (color, family) {
            if let Some(theme) = self.by_color_and_family(color, family) {
                return theme;
            }
        }

        let has_effect = |terms: &[&str]| effects.iter().any(|e| terms.iter().any(|t| e.contains(t)));
        if has_effect(COLOR_CHANGE_EFFECTS) {
            if let Some((gem, entry)) = self.kb.first_known_in("color-changing") {
                debug!(gem, "color-changing effect");
                return ColorTheme::gemstone(gem, entry, DetectionMethod::SpecialEffect);
            }
        }
        if has_effect(MULTICOLOR_EFFECTS) {
            for category in ["rainbow", "multicolor"] {
                if let Some((gem, entry)) = self.kb.first_known_in(category) {
                    debug!(gem, category, "multicolor effect");
                    return ColorTheme::gemstone(gem, entry, DetectionMethod::SpecialEffect);
                }
            }
        }

        let text = attrs
            .text_entries()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some(theme) = self.by_name(&text) {
            return theme;
        }

        if let Some(color) = color {
            if let Some(basic) = normalize_color(color) {
                let representative = self.kb.category(basic).first();
                if let Some((gem, entry)) =
                    representative.and_then(|g| self.kb.gemstones.get_key_value(g.as_str()))
                {
                    debug!(gem = %gem, color = basic, "color category representative");
                    return ColorTheme {
                        detected_color: Some(basic.to_string()),
                        ..ColorTheme::from_entry(entry, DetectionMethod::ColorCategory)
                    };
                }
            }
        }

        self.default_theme()
    }

    fn by_color_and_family(&self, color: &str, family: &str) -> Option<ColorTheme> {
        let basic = normalize_color(color)?;

        if let Some(family_key) = self.family_key(family) {
            if let Some(variety) = self.kb.variety(family_key, basic) {
                if let Some(entry) = self.kb.gemstone(variety) {
                    debug!(family = family_key, color = basic, variety, "color+family match");
                    return Some(ColorTheme::gemstone(variety, entry, DetectionMethod::ColorFamily));
                }
            }
        }

        let (gem, entry) = self.kb.first_known_in(basic)?;
        debug!(gem, color = basic, "color match");
        Some(ColorTheme::gemstone(gem, entry, DetectionMethod::Color))
    }

    /// Exact family name first, else the first family named in the text.
    fn family_key(&self, family: &str) -> Option<&str> {
        let family = family.trim().to_lowercase();
        if let Some((key, _)) = self.kb.varieties.get_key_value(family.as_str()) {
            return Some(key.as_str());
        }
        self.family_patterns
            .iter()
            .find(|(_, re)| re.is_match(&family))
            .map(|(key, _)| key.as_str())
    }

    fn by_name(&self, text: &str) -> Option<ColorTheme> {
        for (gem, re) in &self.gem_patterns {
            let hit = if gem == TOURMALINE {
                TOURMALINE_NAMES.iter().any(|n| text.contains(n))
            } else {
                re.is_match(text)
            };
            if hit {
                let entry = self.kb.gemstone(gem)?;
                debug!(gem = %gem, "gemstone name match");
                return Some(ColorTheme::gemstone(gem, entry, DetectionMethod::Name));
            }
        }

        let (metal, entry) = metal_hit(&self.metal_patterns, &self.kb.metals, text)?;
        debug!(metal, "metal name match");
        Some(ColorTheme {
            detected_metal: Some(metal.to_string()),
            ..ColorTheme::from_entry(entry, DetectionMethod::Name)
        })
    }
}

fn metal_hit<'a>(
    patterns: &'a [(String, Regex)],
    metals: &'a IndexMap<String, GemstoneEntry>,
    text: &str,
) -> Option<(&'a str, &'a GemstoneEntry)> {
    patterns
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .find_map(|(metal, _)| metals.get(metal).map(|e| (metal.as_str(), e)))
}

fn first_present<'a>(attrs: &'a AttributeMap, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| attrs.get_str(f))
        .find(|v| !v.trim().is_empty())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> AttributeMap {
        let mut m = AttributeMap::new();
        for (k, v) in pairs {
            m.insert_if_absent(k, v);
        }
        m
    }

    fn detect(pairs: &[(&str, &str)]) -> ColorTheme {
        ThemeMatcher::new(KnowledgeBase::default()).detect(&map(pairs))
    }

    #[test]
    fn beryl_green_is_emerald() {
        let t = detect(&[("Gemstone", "Beryl"), ("Color", "Green")]);
        assert_eq!(t.name, "Emerald");
        assert_eq!(t.detected_gemstone.as_deref(), Some("emerald"));
        assert_eq!(t.detection_method, DetectionMethod::ColorFamily);
    }

    #[test]
    fn family_named_inside_text() {
        let t = detect(&[("Gemstone Name", "Natural Beryl"), ("Color", "Sky blue")]);
        assert_eq!(t.name, "Aquamarine");
        assert_eq!(t.detection_method, DetectionMethod::ColorFamily);
    }

    #[test]
    fn variety_without_palette_falls_to_color() {
        // tourmaline + red is rubellite, which has no palette of its own
        let t = detect(&[("Gemstone", "Tourmaline"), ("Color", "Red")]);
        assert_eq!(t.name, "Ruby");
        assert_eq!(t.detection_method, DetectionMethod::Color);
    }

    #[test]
    fn color_change_effect() {
        let t = detect(&[("Product Name", "Lab stone"), ("Optical Effect", "Strong color change")]);
        assert_eq!(t.name, "Alexandrite");
        assert_eq!(t.detection_method, DetectionMethod::SpecialEffect);
    }

    #[test]
    fn play_of_color_effect() {
        // labradorite is the only rainbow gem with a palette
        let t = detect(&[("Phenomena", "Play of color")]);
        assert_eq!(t.name, "Labradorite");
        assert_eq!(t.detection_method, DetectionMethod::SpecialEffect);
    }

    #[test]
    fn rubellite_is_tourmaline() {
        let t = detect(&[("Product Name", "Rubellite Pendant")]);
        assert_eq!(t.detected_gemstone.as_deref(), Some("tourmaline"));
        assert_eq!(t.detection_method, DetectionMethod::Name);
    }

    #[test]
    fn plural_name_match() {
        let t = detect(&[("Product Name", "Set of three opals")]);
        assert_eq!(t.name, "Opal");
        assert_eq!(t.detection_method, DetectionMethod::Name);
    }

    #[test]
    fn metal_match() {
        let t = detect(&[("Product Name", "Plain band"), ("Metal", "18k Rose Gold")]);
        assert_eq!(t.name, "Gold");
        assert_eq!(t.detected_metal.as_deref(), Some("gold"));
        assert_eq!(t.detected_gemstone, None);
    }

    #[test]
    fn color_category_representative() {
        let t = detect(&[("Product Name", "Silk scarf"), ("Color", "Crimson")]);
        assert_eq!(t.name, "Ruby");
        assert_eq!(t.detected_color.as_deref(), Some("red"));
        assert_eq!(t.detection_method, DetectionMethod::ColorCategory);
    }

    #[test]
    fn default_when_nothing_matches() {
        let t = detect(&[("Product Name", "Wooden spoon")]);
        assert_eq!(t.name, "Default");
        assert_eq!(t.detection_method, DetectionMethod::None);
        assert_eq!(detect(&[]).detection_method, DetectionMethod::None);
    }

    #[test]
    fn method_serializes_as_label() {
        let json = serde_json::to_string(&DetectionMethod::ColorFamily).unwrap();
        assert_eq!(json, r#""color+family""#);
        assert_eq!(DetectionMethod::ColorCategory.to_string(), "color-category");
    }
}
