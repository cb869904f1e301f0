use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const GEMSTONE_NAMES: &[&str] = &[
    "Diamond", "Emerald", "Ruby", "Sapphire", "Amethyst", "Topaz", "Opal", "Garnet",
    "Aquamarine", "Citrine", "Peridot", "Tanzanite", "Turquoise", "Moonstone", "Jade",
    "Morganite", "Alexandrite", "Lapis Lazuli", "Onyx", "Pearl", "Quartz", "Agate", "Jasper",
    "Zircon", "Spinel", "Tourmaline", "Labradorite", "Chrysoprase",
];

const METAL_TYPES: &[&str] = &[
    "Sterling Silver", "Silver", "925 Silver", "925", "Gold", "Yellow Gold", "White Gold",
    "Rose Gold", "14K", "18K", "10K", "Platinum", "Palladium", "Titanium", "Stainless Steel",
    "Brass", "Copper", "Bronze", "Tungsten",
];

const MATERIALS: &[&str] = &[
    "Leather", "Cotton", "Linen", "Silk", "Wool", "Canvas", "Wood", "Ceramic", "Glass",
    "Plastic", "Acrylic", "Resin", "Paper", "Cardstock", "Vinyl", "Felt", "Velvet", "Satin",
    "Polyester", "Nylon", "Metal", "Crystal", "Beads",
];

const COLORS: &[&str] = &[
    "Red", "Blue", "Green", "Yellow", "Purple", "Pink", "Orange", "Black", "White", "Gray",
    "Brown", "Teal", "Turquoise", "Navy", "Burgundy", "Maroon", "Gold", "Silver", "Bronze",
    "Copper", "Ivory", "Cream", "Beige", "Tan", "Coral", "Mint", "Olive", "Lavender", "Violet",
    "Indigo", "Magenta", "Amber", "Emerald", "Ruby", "Sapphire",
];

const PRODUCT_TYPES: &[&str] = &[
    "Ring", "Necklace", "Bracelet", "Earrings", "Pendant", "Brooch", "Anklet", "Cufflinks",
    "Tiara", "Charm", "Bangle", "Choker", "Locket", "Stud Earrings", "Hoop Earrings",
    "Engagement Ring", "Wedding Band", "Cabochon", "Loose Gemstone", "Bead", "Keychain",
    "Hair Clip", "Headband", "Scarf", "Hat", "Bag", "Tote Bag", "Wallet", "Purse", "Backpack",
    "Shirt", "T-Shirt", "Dress", "Sweater", "Print", "Poster", "Painting", "Sticker", "Card",
    "Mug", "Candle", "Vase", "Planter", "Pillow", "Blanket", "Quilt", "Rug", "Ornament",
    "Figurine", "Sculpture", "Coaster", "Bowl", "Plate", "Journal", "Notebook", "Bookmark",
    "Lamp", "Mirror", "Clock", "Box", "Basket", "Bookshelf", "Shelving",
];

/// Classifier tier 1: these override the exclusion list.
const CRITICAL_TERMS: &[&str] = &[
    "gemstone", "gem", "stone", "type", "color", "size", "shape", "cut", "carat", "weight",
    "quality", "grade", "clarity", "origin", "country", "region", "manufacture",
    "transparency", "treatment", "natural", "synthetic", "dimension", "mm", "inch",
    "quantity", "piece", "pc", "pcs", "lot",
];

const EXCLUDED_TERMS: &[&str] = &[
    "ship", "shipping", "delivery", "handpicked", "handmade", "shop", "return", "policy",
    "policies", "processing", "custom", "order", "gift", "wrapping", "about", "seller",
    "store", "made in", "made by", "tracking", "package", "dispatch", "business",
    "wholesale", "discount", "feedback", "review", "rating", "contact", "message",
    "question", "ask", "international", "domestic", "local", "pickup", "collection",
];

const PRODUCT_KEYWORDS: &[&str] = &[
    "gemstone", "gem", "stone", "material", "metal", "gold", "silver", "platinum", "diamond",
    "ruby", "sapphire", "emerald", "opal", "jade", "pearl", "crystal", "carat", "weight",
    "color", "clarity", "cut", "shape", "size", "dimension", "length", "width", "height",
    "diameter", "thickness", "style", "design", "pattern", "finish", "polish", "treatment",
    "grade", "quality", "purity", "karat", "transparency", "product", "type", "category",
    "setting", "mount", "band", "chain", "clasp", "back", "closure",
];

const COMMON_KEYS: &[&str] = &[
    "name", "product", "style", "code", "item", "model", "sku", "upc", "brand",
    "manufacturer", "origin", "color", "finish", "material", "composition", "feature",
    "specification", "detail", "description",
];

/// Attributes the full-page fallback hunts for when still missing.
const CRITICAL_ATTRIBUTES: &[&str] = &[
    "Gemstone Type", "Gemstone Name", "Stone", "Stone Type", "Gem Type", "Gem", "Gemstone",
    "Origin", "Country/Region of Origin", "Country of Origin", "Treatment", "Stone Treatment",
    "Gemstone Treatment", "Size", "Dimensions", "Measurements", "Shape", "Stone Shape",
    "Gemstone Shape", "Cut Shape", "Cut", "Stone Cut", "Gemstone Cut", "Quality", "Grade",
    "Clarity", "Gemstone Clarity", "Form", "Type", "Category", "Color", "Stone Color",
    "Gemstone Color", "Weight", "Carat Weight", "Carats", "Carat",
];

const ALIASES: &[(&str, &str)] = &[
    ("Gem Type", "Gemstone Name"),
    ("Gemstone Type", "Gemstone Name"),
    ("Stone Type", "Gemstone Name"),
    ("Stone", "Gemstone Name"),
    ("Gem", "Gemstone Name"),
    ("Gemstone", "Gemstone Name"),
    ("Stone Color", "Gemstone Color"),
    ("Gem Color", "Gemstone Color"),
    ("Stone Treatment", "Treatment"),
    ("Gem Treatment", "Treatment"),
    ("Stone Shape", "Shape"),
    ("Gem Shape", "Shape"),
    ("Cut Shape", "Shape"),
    ("Stone Cut", "Cut"),
    ("Gem Cut", "Cut"),
    ("Carats", "Carat Weight"),
    ("Carat", "Carat Weight"),
    ("Stone Clarity", "Clarity"),
    ("Gem Clarity", "Clarity"),
    ("Measurements", "Dimensions"),
    ("Measurement", "Dimensions"),
    ("Grade", "Cut Grade"),
];

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Ordered term set. Lookup prefers the longest term, so "Sterling Silver"
/// is found before "Silver".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TermDictionary {
    terms: Vec<String>,
    lowered: Vec<String>,
}

impl From<Vec<String>> for TermDictionary {
    fn from(mut terms: Vec<String>) -> Self {
        // stable: equal lengths keep declaration order
        terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        let lowered = terms.iter().map(|t| t.to_lowercase()).collect();
        Self { terms, lowered }
    }
}

impl From<TermDictionary> for Vec<String> {
    fn from(dict: TermDictionary) -> Self {
        dict.terms
    }
}

impl From<&[&str]> for TermDictionary {
    fn from(terms: &[&str]) -> Self {
        owned(terms).into()
    }
}

impl TermDictionary {
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.lowered
            .iter()
            .position(|t| !t.is_empty() && text.contains(t.as_str()))
            .map(|i| self.terms[i].as_str())
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed vocabulary JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Term lists, classifier lists and alias table used by extraction and
/// normalization. Fields missing from an override file keep their built-in
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub gemstones: TermDictionary,
    pub metals: TermDictionary,
    pub materials: TermDictionary,
    pub colors: TermDictionary,
    pub product_types: TermDictionary,
    pub critical_terms: Vec<String>,
    pub excluded_terms: Vec<String>,
    pub product_keywords: Vec<String>,
    pub common_keys: Vec<String>,
    pub critical_attributes: Vec<String>,
    /// variant → canonical, applied in order
    pub aliases: IndexMap<String, String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            gemstones: GEMSTONE_NAMES.into(),
            metals: METAL_TYPES.into(),
            materials: MATERIALS.into(),
            colors: COLORS.into(),
            product_types: PRODUCT_TYPES.into(),
            critical_terms: owned(CRITICAL_TERMS),
            excluded_terms: owned(EXCLUDED_TERMS),
            product_keywords: owned(PRODUCT_KEYWORDS),
            common_keys: owned(COMMON_KEYS),
            critical_attributes: owned(CRITICAL_ATTRIBUTES),
            aliases: ALIASES
                .iter()
                .map(|(v, c)| (v.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_first() {
        let v = Vocabulary::default();
        assert_eq!(v.metals.lookup("Solid sterling silver band"), Some("Sterling Silver"));
        assert_eq!(v.metals.lookup("14k Rose Gold ring"), Some("Rose Gold"));
        assert_eq!(v.metals.lookup("plain silver"), Some("Silver"));
    }

    #[test]
    fn case_insensitive_substring() {
        let v = Vocabulary::default();
        assert_eq!(v.gemstones.lookup("NATURAL LAPIS LAZULI beads"), Some("Lapis Lazuli"));
        assert_eq!(v.gemstones.lookup("wooden spoon"), None);
    }

    #[test]
    fn override_keeps_missing_fields() {
        let v = Vocabulary::from_json(r#"{"metals": ["Niobium", "Silver"]}"#).unwrap();
        assert_eq!(v.metals.lookup("niobium hoops"), Some("Niobium"));
        assert_eq!(v.gemstones.lookup("opal"), Some("Opal"));
        assert_eq!(v.aliases.get("Gem Type").map(String::as_str), Some("Gemstone Name"));
    }

    #[test]
    fn malformed_override() {
        assert!(matches!(
            Vocabulary::from_json("{not json"),
            Err(VocabularyError::Json(_))
        ));
    }
}
