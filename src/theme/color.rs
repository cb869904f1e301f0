use std::sync::LazyLock;

use regex::Regex;

/// Basic colors in match priority order with the words that imply them.
/// Several words (garnet, topaz, spinel) could plausibly sit in more than one
/// list; the first category to match wins.
const COLOR_SYNONYMS: &[(&str, &[&str])] = &[
    ("red", &["red", "ruby", "crimson", "scarlet", "burgundy", "maroon", "blood", "garnet", "cinnabar"]),
    ("pink", &["pink", "rose", "magenta", "fuchsia", "blush", "salmon", "rhodochrosite", "morganite"]),
    ("orange", &["orange", "amber", "coral", "peach", "carnelian", "spessartite", "hessonite", "padparadscha"]),
    ("yellow", &["yellow", "gold", "lemon", "canary", "honey", "citrine", "heliodor", "sulfur", "topaz"]),
    ("green", &["green", "emerald", "mint", "olive", "jade", "peridot", "chrysoprase", "malachite", "aventurine", "tsavorite", "chrome"]),
    ("aqua", &["aqua", "turquoise", "teal", "cyan", "sea", "aquamarine", "larimar", "paraiba"]),
    ("blue", &["blue", "azure", "sapphire", "navy", "indigo", "cobalt", "lapis", "iolite", "kyanite", "celestite", "azurite"]),
    ("purple", &["purple", "violet", "lavender", "amethyst", "lilac", "mauve", "tanzanite", "sugilite", "charoite"]),
    ("brown", &["brown", "chocolate", "coffee", "tan", "bronze", "smoky", "cognac", "cinnamon", "sepia"]),
    ("black", &["black", "onyx", "jet", "ebony", "obsidian", "morion", "schorl", "spinel"]),
    ("gray", &["gray", "grey", "silver", "slate", "pewter", "hematite", "pyrite", "marcasite"]),
    ("white", &["white", "pearl", "ivory", "cream", "moonstone", "howlite", "selenite", "magnesite"]),
    ("clear", &["clear", "transparent", "colorless", "colourless", "crystal", "diamond", "goshenite", "quartz"]),
    ("multicolor", &["multicolor", "multi-color", "multi color", "mixed", "variegated", "play of color", "labradorescence", "opalescence"]),
    ("rainbow", &["rainbow", "spectrum", "iridescent", "fire", "mystic", "iris"]),
    ("color-changing", &["color change", "color-change", "alexandrite", "changing", "chameleon"]),
];

// Synonyms must start a word: "multicolored" is not "red", "reddish" is.
static SYNONYM_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COLOR_SYNONYMS
        .iter()
        .map(|(category, words)| {
            let alt = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
            (*category, Regex::new(&format!(r"(?i)\b(?:{})", alt)).unwrap())
        })
        .collect()
});

/// Map free-text color to exactly one basic color name, or None.
pub fn normalize_color(text: &str) -> Option<&'static str> {
    SYNONYM_RES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(category, _)| *category)
}
