pub mod backfill;
pub mod description;
pub mod details;
pub mod embedded;
pub mod fallback;
pub mod title;

use tracing::debug;

use super::attrs::AttributeMap;
use super::classify::is_product_attribute;
use super::dictionary::Vocabulary;
use super::normalize::has_dimensions;
use crate::page::PageInput;
use fallback::FallbackMatcher;

/// Product Name always comes from the raw title.
pub const PRODUCT_NAME: &str = "Product Name";

/// At or below this many structured details the embedded attribute JSON is
/// consulted as well.
const EMBEDDED_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRegion {
    Title,
    StructuredDetails,
    Highlights,
    Description,
    AggregateFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    pub value: String,
    pub source: SourceRegion,
}

impl Candidate {
    pub fn new(key: impl Into<String>, value: impl Into<String>, source: SourceRegion) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source,
        }
    }
}

/// Extraction strategies in precedence order. Earlier strategies win
/// conflicting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TitlePairs,
    StructuredDetails,
    EmbeddedAttributes,
    Highlights,
    Description,
    TermBackfill,
    AggressiveFallback,
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy::TitlePairs,
    Strategy::StructuredDetails,
    Strategy::EmbeddedAttributes,
    Strategy::Highlights,
    Strategy::Description,
    Strategy::TermBackfill,
    Strategy::AggressiveFallback,
];

pub struct Extractor {
    vocab: Vocabulary,
    fallback: FallbackMatcher,
}

impl Extractor {
    pub fn new(vocab: Vocabulary) -> Self {
        let fallback = FallbackMatcher::new(&vocab.critical_attributes);
        Self { vocab, fallback }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Run every strategy over the page and merge first-writer-wins.
    pub fn extract(&self, page: &PageInput) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert_if_absent(PRODUCT_NAME, &page.title);

        let mut structured_found = 0;
        for &strategy in STRATEGIES {
            let candidates = match strategy {
                Strategy::TitlePairs => title::extract(&page.title),
                Strategy::StructuredDetails => {
                    let c = details::extract(
                        &page.regions.structured_details,
                        SourceRegion::StructuredDetails,
                    );
                    structured_found = c.len();
                    c
                }
                Strategy::EmbeddedAttributes => {
                    if structured_found > EMBEDDED_THRESHOLD {
                        continue;
                    }
                    embedded::extract(&page.document_text)
                }
                Strategy::Highlights => {
                    details::extract(&page.regions.highlights, SourceRegion::Highlights)
                }
                Strategy::Description => description::extract(&page.regions.description),
                Strategy::TermBackfill => {
                    let mut c =
                        backfill::extract(&page.title, &page.regions.description, &self.vocab);
                    if has_dimensions(&attrs) {
                        c.retain(|cand| cand.key != backfill::SIZE);
                    }
                    c
                }
                Strategy::AggressiveFallback => {
                    if missing_critical(&attrs, &self.vocab).is_empty() {
                        debug!(source = %page.source, "all critical attributes present, skipping fallback");
                        break;
                    }
                    self.fallback.extract(&page.document_text, &attrs)
                }
            };

            let merged = merge(&mut attrs, candidates, &self.vocab);
            debug!(source = %page.source, ?strategy, merged, "strategy merged");
        }

        attrs
    }
}

/// Insert candidates that pass the classifier. Fallback candidates are
/// already restricted to critical attributes and skip it. Alias spellings
/// count as the same key, so a later "Gemstone Name" cannot displace an
/// earlier "Gem Type" once normalized.
fn merge(attrs: &mut AttributeMap, candidates: Vec<Candidate>, vocab: &Vocabulary) -> usize {
    let canonical = |key: &str| -> String {
        vocab.aliases.get(key).cloned().unwrap_or_else(|| key.to_string())
    };

    let mut merged = 0;
    for c in candidates {
        if c.source != SourceRegion::AggregateFallback && !is_product_attribute(&c.key, vocab) {
            continue;
        }
        let target = canonical(c.key.trim());
        if attrs.keys().any(|k| canonical(k) == target) {
            continue;
        }
        if attrs.insert_if_absent(&c.key, &c.value) {
            merged += 1;
        }
    }
    merged
}

/// An attribute counts as present when an existing key contains it or is
/// contained in it, ignoring case.
pub fn has_attribute<'a>(mut keys: impl Iterator<Item = &'a str>, attr: &str) -> bool {
    let attr = attr.to_lowercase();
    keys.any(|k| {
        let k = k.to_lowercase();
        k.contains(&attr) || attr.contains(&k)
    })
}

pub fn missing_critical<'v>(attrs: &AttributeMap, vocab: &'v Vocabulary) -> Vec<&'v str> {
    vocab
        .critical_attributes
        .iter()
        .filter(|a| !has_attribute(attrs.keys(), a))
        .map(String::as_str)
        .collect()
}

// ── Tests ──
