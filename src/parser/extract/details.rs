use super::{Candidate, SourceRegion};
use crate::parser::patterns::{clean_pair, split_pair};

/// Labelled pairs from an "item details" or "highlights" block. Unlabelled
/// entries are split with the text patterns.
pub fn extract(pairs: &[(String, String)], source: SourceRegion) -> Vec<Candidate> {
    pairs
        .iter()
        .filter_map(|(label, value)| {
            let label = label.trim().trim_end_matches(':');
            match (label.is_empty(), value.trim().is_empty()) {
                (true, _) => split_pair(value),
                (false, true) => split_pair(label),
                (false, false) => clean_pair(label, value),
            }
        })
        .map(|(k, v)| Candidate::new(k, v, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn labelled_and_raw() {
        let input = pairs(&[
            ("Gemstone:", "Opal"),
            ("", "Materials: Metal: Sterling silver"),
            ("Origin: Australia", ""),
            ("", ""),
        ]);
        let c = extract(&input, SourceRegion::StructuredDetails);
        let got: Vec<(&str, &str)> = c.iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
        assert_eq!(
            got,
            vec![("Gemstone", "Opal"), ("Metal", "Sterling silver"), ("Origin", "Australia")]
        );
        assert!(c.iter().all(|c| c.source == SourceRegion::StructuredDetails));
    }
}
