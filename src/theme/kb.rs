use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Palette and description for one gemstone or metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemstoneEntry {
    pub name: String,
    pub primary_color: String,
    pub complementary_color: String,
    pub header_bg: String,
    pub row_bg: String,
    #[serde(default = "white")]
    pub alt_row_bg: String,
    #[serde(default = "black")]
    pub text_color: String,
    #[serde(default)]
    pub description: String,
}

fn white() -> String {
    "#FFFFFF".to_string()
}

fn black() -> String {
    "#000000".to_string()
}

// key, name, primary, complementary, header, row, description
type Swatch = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

const GEMSTONES: &[Swatch] = &[
    ("ruby", "Ruby", "#9B111E", "#F9D5EB", "#E0115F", "#F9D5EB", "Deep red gemstone symbolizing passion and vitality"),
    ("amethyst", "Amethyst", "#9966CC", "#E6E6FA", "#9966CC", "#E6E6FA", "Purple variety of quartz symbolizing peace and protection"),
    ("emerald", "Emerald", "#009473", "#E0F5E6", "#009473", "#E0F5E6", "Vibrant green gemstone symbolizing growth and renewal"),
    ("sapphire", "Sapphire", "#0F52BA", "#D0E1F9", "#0F52BA", "#D0E1F9", "Deep blue gemstone symbolizing wisdom and royalty"),
    ("turquoise", "Turquoise", "#00836E", "#E0F5F5", "#00836E", "#E0F5F5", "Blue-green gemstone symbolizing healing and protection"),
    ("garnet", "Garnet", "#830E0D", "#F5E6E6", "#830E0D", "#F5E6E6", "Deep red gemstone symbolizing strength and protection"),
    ("citrine", "Citrine", "#E4D00A", "#FFF8E0", "#E4D00A", "#FFF8E0", "Yellow variety of quartz symbolizing abundance and joy"),
    ("topaz", "Topaz", "#FFC87C", "#FFF1E6", "#FFC87C", "#FFF1E6", "Golden-yellow gemstone symbolizing strength and intellect"),
    ("opal", "Opal", "#A8C3BC", "#F0F5F3", "#A8C3BC", "#F0F5F3", "Iridescent gemstone symbolizing hope and purity"),
    ("pearl", "Pearl", "#F0EAD6", "#FFFAF0", "#F0EAD6", "#FFFAF0", "Organic gemstone symbolizing purity and innocence"),
    ("diamond", "Diamond", "#B9F2FF", "#F0F8FF", "#B9F2FF", "#F0F8FF", "Brilliant clear gemstone symbolizing eternity and strength"),
    ("jade", "Jade", "#00A86B", "#E0F5EB", "#00A86B", "#E0F5EB", "Green stone symbolizing harmony and balance"),
    ("aquamarine", "Aquamarine", "#7FFFD4", "#E0FFFA", "#7FFFD4", "#E0FFFA", "Pale blue-green gemstone symbolizing courage and clarity"),
    ("morganite", "Morganite", "#FFACC7", "#FFF0F5", "#FFACC7", "#FFF0F5", "Pink beryl gemstone symbolizing compassion and love"),
    ("tanzanite", "Tanzanite", "#6A5ACD", "#E6E6FA", "#6A5ACD", "#E6E6FA", "Blue-purple gemstone symbolizing transformation"),
    ("peridot", "Peridot", "#AAFF00", "#F5FFEB", "#AAFF00", "#F5FFEB", "Olive-green gemstone symbolizing strength and good fortune"),
    ("moonstone", "Moonstone", "#E6E6FA", "#F8F8FF", "#E6E6FA", "#F8F8FF", "Pearly gemstone symbolizing intuition and new beginnings"),
    ("labradorite", "Labradorite", "#52667a", "#e6e8e9", "#52667a", "#e6e8e9", "Feldspar gemstone known for its labradorescence color play effect"),
    ("lapis lazuli", "Lapis Lazuli", "#26619c", "#e0eaf5", "#26619c", "#e0eaf5", "Deep blue metamorphic rock with golden pyrite inclusions"),
    ("malachite", "Malachite", "#0bda51", "#e0f5e8", "#0bda51", "#e0f5e8", "Banded green copper carbonate mineral with distinctive patterns"),
    ("alexandrite", "Alexandrite", "#008000", "#f0f5f0", "#008000", "#f0f5f0", "Color-changing gemstone appearing green in daylight and red in incandescent light"),
    ("rhodochrosite", "Rhodochrosite", "#e03c31", "#f9e6e5", "#e03c31", "#f9e6e5", "Pink to rose-red manganese carbonate mineral with banded patterns"),
    ("larimar", "Larimar", "#7eb6ff", "#eef5ff", "#7eb6ff", "#eef5ff", "Rare blue variety of pectolite found only in the Dominican Republic"),
    ("kunzite", "Kunzite", "#e5c4d4", "#f9f5f7", "#e5c4d4", "#f9f5f7", "Pale pink to lilac spodumene gemstone with strong pleochroism"),
    ("iolite", "Iolite", "#3f5fa9", "#e6eaf5", "#3f5fa9", "#e6eaf5", "Violet-blue cordierite gemstone with strong pleochroism"),
    ("sunstone", "Sunstone", "#e67e30", "#f9eee5", "#e67e30", "#f9eee5", "Feldspar with copper inclusions creating a metallic aventurescence effect"),
    ("tourmaline", "Tourmaline", "#3B7A57", "#E3F1E8", "#3B7A57", "#E3F1E8", "Pleochroic cyclosilicate found in nearly every color, often as bicolor crystals"),
];

const METALS: &[Swatch] = &[
    ("gold", "Gold", "#D4AF37", "#FFF8E0", "#D4AF37", "#FFF8E0", "Precious yellow metal symbolizing wealth and prosperity"),
    ("silver", "Silver", "#C0C0C0", "#F5F5F5", "#C0C0C0", "#F5F5F5", "Precious white metal symbolizing purity and clarity"),
    ("platinum", "Platinum", "#E5E4E2", "#F8F8F8", "#E5E4E2", "#F8F8F8", "Rare white metal symbolizing prestige and endurance"),
    ("rose gold", "Rose Gold", "#B76E79", "#F9E6E9", "#B76E79", "#F9E6E9", "Pink-hued gold alloy symbolizing romance and elegance"),
];

const DEFAULT_THEME: Swatch = ("default", "Default", "#6A5ACD", "#F0F8FF", "#6A5ACD", "#F0F8FF", "Default color scheme");

/// Basic color → gemstones of that color. The first entry is the category's
/// representative.
const COLOR_CATEGORIES: &[(&str, &[&str])] = &[
    ("red", &["ruby", "garnet", "red beryl", "red spinel", "red tourmaline", "rhodochrosite", "cuprite", "cinnabar", "realgar", "rubellite", "red jasper", "carnelian", "fire opal"]),
    ("pink", &["morganite", "pink sapphire", "pink tourmaline", "pink topaz", "pink spinel", "kunzite", "rose quartz", "rhodochrosite", "rhodonite", "pink opal", "pink coral", "thulite"]),
    ("orange", &["spessartite", "orange sapphire", "fire opal", "orange tourmaline", "sunstone", "padparadscha", "carnelian", "orange calcite", "orange zircon", "hessonite", "spessartine", "mexican opal"]),
    ("yellow", &["citrine", "yellow sapphire", "yellow beryl", "yellow tourmaline", "yellow topaz", "heliodor", "amber", "yellow jade", "yellow apatite", "yellow calcite", "golden beryl", "sphene", "sulfur"]),
    ("green", &["emerald", "peridot", "green tourmaline", "green beryl", "jade", "chrysoprase", "malachite", "alexandrite", "aventurine", "green apatite", "chrome diopside", "tsavorite", "green fluorite", "nephrite", "hiddenite", "prasiolite", "prehnite", "variscite", "gaspeite", "chrysoberyl", "diopside", "dioptase", "epidote", "fuchsite", "maw sit sit", "serpentine", "seraphinite", "verdelite", "zoisite"]),
    ("aqua", &["aquamarine", "blue-green tourmaline", "hemimorphite", "chrysocolla", "larimar", "amazonite", "paraiba tourmaline", "apatite", "blue-green fluorite", "turquoise", "blue chalcedony", "blue apatite"]),
    ("blue", &["sapphire", "blue topaz", "blue tourmaline", "blue beryl", "blue spinel", "lapis lazuli", "larimar", "iolite", "kyanite", "blue fluorite", "blue chalcedony", "azurite", "benitoite", "blue apatite", "blue zircon", "hauyne", "indicolite", "sodalite", "shattuckite", "dumortierite", "celestite", "apatite", "blue amber", "blue quartz", "cavansite", "vivianite", "chalcanthite", "lazulite"]),
    ("purple", &["amethyst", "purple sapphire", "purple spinel", "purple tourmaline", "tanzanite", "iolite", "kunzite", "charoite", "sugilite", "lepidolite", "fluorite", "purple jade", "purpurite", "stichtite"]),
    ("brown", &["smoky quartz", "brown tourmaline", "brown zircon", "amber", "andalusite", "axinite", "bronzite", "brown jasper", "dravite", "hypersthene", "pietersite", "tiger's eye", "zircon"]),
    ("black", &["black diamond", "black spinel", "black tourmaline", "onyx", "obsidian", "jet", "black jade", "black opal", "black star sapphire", "hematite", "magnetite", "schorl", "shungite", "tektite", "morion", "nuummite"]),
    ("white", &["diamond", "white sapphire", "white topaz", "moonstone", "goshenite", "white beryl", "pearl", "white jade", "white opal", "white agate", "white coral", "white howlite", "white calcite", "selenite", "magnesite", "white quartz"]),
    ("clear", &["diamond", "rock crystal", "goshenite", "danburite", "phenacite", "apophyllite", "quartz", "zircon", "topaz", "moissanite", "scolecite", "selenite"]),
    ("gray", &["labradorite", "hematite", "gray spinel", "gray diamond", "gray moonstone", "gray agate", "gray chalcedony", "pyrite", "marcasite", "platinum"]),
    ("multicolor", &["labradorite", "opal", "ammolite", "alexandrite", "watermelon tourmaline", "fluorite", "tourmaline", "mystic topaz", "mystic quartz", "ametrine", "rainbow moonstone", "rainbow fluorite", "rainbow obsidian", "rainbow pyrite", "rainbow hematite"]),
    ("rainbow", &["rainbow moonstone", "rainbow fluorite", "rainbow obsidian", "rainbow pyrite", "rainbow hematite", "mystic topaz", "mystic quartz", "fire agate", "fire opal", "iris agate", "labradorite"]),
    ("color-changing", &["alexandrite", "color-change garnet", "color-change sapphire", "color-change fluorite", "color-change diaspore", "color-change spinel"]),
];

/// (family, basic color) → variety. Colors use the basic color names, so
/// "colorless" is listed as "clear".
const VARIETIES: &[(&str, &[(&str, &str)])] = &[
    ("beryl", &[("yellow", "heliodor"), ("green", "emerald"), ("blue", "aquamarine"), ("pink", "morganite"), ("red", "bixbite"), ("clear", "goshenite")]),
    ("corundum", &[("red", "ruby"), ("blue", "sapphire"), ("yellow", "yellow sapphire"), ("pink", "pink sapphire"), ("purple", "purple sapphire"), ("orange", "padparadscha")]),
    ("quartz", &[("purple", "amethyst"), ("yellow", "citrine"), ("pink", "rose quartz"), ("brown", "smoky quartz"), ("clear", "rock crystal")]),
    ("tourmaline", &[("green", "verdelite"), ("blue", "indicolite"), ("red", "rubellite"), ("pink", "pink tourmaline"), ("yellow", "yellow tourmaline"), ("black", "schorl")]),
    ("topaz", &[("blue", "blue topaz"), ("yellow", "imperial topaz"), ("pink", "pink topaz"), ("clear", "white topaz")]),
    ("feldspar", &[("gray", "labradorite"), ("white", "moonstone"), ("green", "amazonite"), ("orange", "sunstone")]),
    ("opal", &[("white", "white opal"), ("black", "black opal")]),
    ("garnet", &[("red", "pyrope"), ("orange", "spessartite"), ("green", "tsavorite"), ("purple", "rhodolite")]),
    ("spinel", &[("red", "red spinel"), ("blue", "blue spinel"), ("pink", "pink spinel"), ("purple", "purple spinel"), ("black", "black spinel")]),
];

fn swatch_entry(s: &Swatch) -> GemstoneEntry {
    GemstoneEntry {
        name: s.1.to_string(),
        primary_color: s.2.to_string(),
        complementary_color: s.3.to_string(),
        header_bg: s.4.to_string(),
        row_bg: s.5.to_string(),
        alt_row_bg: white(),
        text_color: black(),
        description: s.6.to_string(),
    }
}

fn swatches(table: &[Swatch]) -> IndexMap<String, GemstoneEntry> {
    table.iter().map(|s| (s.0.to_string(), swatch_entry(s))).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed knowledge base JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reference data for theme detection. Keys are lowercase; map order is the
/// scan order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub gemstones: IndexMap<String, GemstoneEntry>,
    pub metals: IndexMap<String, GemstoneEntry>,
    pub colors: IndexMap<String, Vec<String>>,
    pub varieties: IndexMap<String, IndexMap<String, String>>,
    pub default_theme: GemstoneEntry,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            gemstones: swatches(GEMSTONES),
            metals: swatches(METALS),
            colors: COLOR_CATEGORIES
                .iter()
                .map(|(c, gems)| (c.to_string(), gems.iter().map(|g| g.to_string()).collect()))
                .collect(),
            varieties: VARIETIES
                .iter()
                .map(|(family, table)| {
                    let table = table.iter().map(|(c, v)| (c.to_string(), v.to_string())).collect();
                    (family.to_string(), table)
                })
                .collect(),
            default_theme: swatch_entry(&DEFAULT_THEME),
        }
    }
}

impl KnowledgeBase {
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn gemstone(&self, name: &str) -> Option<&GemstoneEntry> {
        self.gemstones.get(name)
    }

    pub fn category(&self, color: &str) -> &[String] {
        self.colors.get(color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First gem of the category that has a palette.
    pub fn first_known_in(&self, color: &str) -> Option<(&str, &GemstoneEntry)> {
        self.category(color)
            .iter()
            .find_map(|g| self.gemstones.get_key_value(g.as_str()))
            .map(|(k, e)| (k.as_str(), e))
    }

    pub fn variety(&self, family: &str, color: &str) -> Option<&str> {
        self.varieties
            .get(family)
            .and_then(|t| t.get(color))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.gemstones.len(), 27);
        assert_eq!(kb.gemstones.keys().next().map(String::as_str), Some("ruby"));
        assert_eq!(kb.gemstone("ruby").map(|e| e.header_bg.as_str()), Some("#E0115F"));
        assert_eq!(kb.colors.len(), 16);
        assert_eq!(kb.variety("beryl", "clear"), Some("goshenite"));
        assert_eq!(kb.default_theme.name, "Default");
    }

    #[test]
    fn first_known_skips_unlisted() {
        let kb = KnowledgeBase::default();
        // "smoky quartz", "brown tourmaline", ... have no palette
        assert_eq!(kb.first_known_in("brown").map(|(k, _)| k), None);
        assert_eq!(kb.first_known_in("aqua").map(|(k, _)| k), Some("aquamarine"));
        assert_eq!(kb.first_known_in("nope").map(|(k, _)| k), None);
    }

    #[test]
    fn override_defaults_missing_fields() {
        let json = r##"{"metals": {"copper": {"name": "Copper", "primary_color": "#B87333",
            "complementary_color": "#FBEFE6", "header_bg": "#B87333", "row_bg": "#FBEFE6"}}}"##;
        let kb = KnowledgeBase::from_json(json).unwrap();
        assert_eq!(kb.metals.len(), 1);
        assert_eq!(kb.metals["copper"].alt_row_bg, "#FFFFFF");
        assert_eq!(kb.gemstones.len(), 27);
    }
}
