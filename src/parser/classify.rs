use super::dictionary::Vocabulary;

/// Decide whether a label names a product attribute rather than shop,
/// shipping or policy noise. Ambiguous labels are excluded.
pub fn is_product_attribute(key: &str, vocab: &Vocabulary) -> bool {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return false;
    }
    // override lists may carry any casing
    let contains_any =
        |terms: &[String]| terms.iter().any(|t| key.contains(t.to_lowercase().as_str()));

    if contains_any(&vocab.critical_terms) {
        return true;
    }
    if contains_any(&vocab.excluded_terms) {
        return false;
    }
    contains_any(&vocab.product_keywords) || contains_any(&vocab.common_keys)
}
