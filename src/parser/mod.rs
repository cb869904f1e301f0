pub mod attrs;
pub mod classify;
pub mod dictionary;
pub mod extract;
pub mod normalize;
pub mod patterns;

use serde::Serialize;

use crate::page::PageInput;
use crate::theme::kb::KnowledgeBase;
use crate::theme::{ColorTheme, ThemeMatcher};
use attrs::AttributeMap;
use dictionary::Vocabulary;
use extract::Extractor;

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub source: String,
    pub attributes: AttributeMap,
    pub theme: ColorTheme,
}

/// Immutable extraction and theme configuration, shared across threads.
pub struct Pipeline {
    extractor: Extractor,
    themes: ThemeMatcher,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Vocabulary::default(), KnowledgeBase::default())
    }
}

impl Pipeline {
    pub fn new(vocab: Vocabulary, kb: KnowledgeBase) -> Self {
        Self {
            extractor: Extractor::new(vocab),
            themes: ThemeMatcher::new(kb),
        }
    }

    /// Page → merged attributes → normalized attributes → theme.
    pub fn process_page(&self, page: &PageInput) -> Listing {
        if page.is_blank() {
            let mut attributes = AttributeMap::new();
            attributes.set_images(&page.images);
            return Listing {
                source: page.source.clone(),
                attributes,
                theme: self.themes.default_theme(),
            };
        }

        let merged = self.extractor.extract(page);
        let mut attributes = normalize::normalize(&merged, &self.extractor.vocab().aliases);
        attributes.set_images(&page.images);
        let theme = self.themes.detect(&attributes);

        Listing {
            source: page.source.clone(),
            attributes,
            theme,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot;
    use crate::theme::DetectionMethod;

    fn run(fixture: &str) -> Listing {
        let page = snapshot::load_file(format!("tests/fixtures/{}.json", fixture)).unwrap();
        Pipeline::default().process_page(&page)
    }

    #[test]
    fn etsy_amethyst_ring() {
        let l = run("etsy_amethyst_ring");
        let a = &l.attributes;
        assert_eq!(a.get_str("Product Name"), Some("Natural Amethyst Ring, 925 Sterling Silver, Size 7"));
        assert_eq!(a.get_str("Gemstone Name"), Some("Quartz"));
        assert_eq!(a.get_str("Metal"), Some("Sterling silver"));
        assert_eq!(a.get_str("Treatment"), Some("None"));
        assert_eq!(a.get_str("Shape"), Some("Oval"));
        assert_eq!(a.get_str("Dimensions"), Some("Length: 10mm, Width: 8mm"));
        assert_eq!(a.get_str("Ring Size"), Some("7"));
        assert_eq!(a.get_str("Origin"), Some("Brazil"));
        assert!(!a.contains_key("Gemstone"));
        assert!(!a.contains_key("Stone Shape"));
        assert!(!a.contains_key("Shipping"));
        assert!(!a.contains_key("Processing time"));
        assert_eq!(a.images().len(), 2);
        assert_eq!(l.theme.name, "Amethyst");
        assert_eq!(l.theme.detection_method, DetectionMethod::ColorFamily);
    }

    #[test]
    fn ebay_embedded_attributes() {
        let l = run("ebay_sapphire");
        let a = &l.attributes;
        assert_eq!(a.get_str("Gemstone Name"), Some("Sapphire"));
        assert_eq!(a.get_str("Cut Grade"), Some("Excellent"));
        assert_eq!(a.get_str("Carat Weight"), Some("1.52"));
        assert_eq!(a.get_str("Origin"), Some("Sri Lanka"));
        assert_eq!(l.theme.name, "Sapphire");
    }

    #[test]
    fn blank_page_keeps_images() {
        let l = run("blank_page");
        assert_eq!(l.attributes.len(), 1);
        assert_eq!(l.attributes.images(), &["https://img.example/1.jpg".to_string()]);
        assert_eq!(l.theme.detection_method, DetectionMethod::None);
    }

    #[test]
    fn normalized_output_is_stable() {
        let pipeline = Pipeline::default();
        for fixture in ["etsy_amethyst_ring", "ebay_sapphire"] {
            let l = run(fixture);
            let again = normalize::normalize(&l.attributes, &pipeline.extractor.vocab().aliases);
            assert_eq!(again, l.attributes);
        }
    }
}
