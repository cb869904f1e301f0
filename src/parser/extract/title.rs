use super::{Candidate, SourceRegion};
use crate::parser::patterns::split_pair;

/// Labelled segments embedded in a title, e.g.
/// "Opal Pendant | Stone: Ethiopian Opal | Size: 10mm".
pub fn extract(title: &str) -> Vec<Candidate> {
    title
        .split('|')
        .filter(|seg| seg.contains(':'))
        .filter_map(split_pair)
        .map(|(k, v)| Candidate::new(k, v, SourceRegion::Title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_segments_only() {
        let c = extract("Opal Pendant | Stone: Ethiopian Opal | Size: 10mm");
        let pairs: Vec<(&str, &str)> = c.iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
        assert_eq!(pairs, vec![("Stone", "Ethiopian Opal"), ("Size", "10mm")]);
    }

    #[test]
    fn plain_title_has_no_pairs() {
        assert!(extract("Natural Opal Ring - Sterling Silver").is_empty());
    }
}
