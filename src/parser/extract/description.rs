use super::{Candidate, SourceRegion};
use crate::parser::patterns::{fragments, split_pair};

pub fn extract(description: &str) -> Vec<Candidate> {
    fragments(description)
        .filter_map(split_pair)
        .map(|(k, v)| Candidate::new(k, v, SourceRegion::Description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_and_bullets() {
        let text = "A lovely stone from our collection.\n\
                    • Shape: Oval • Cut - Cabochon\n\
                    ✓ Treatment: None\n\
                    Thanks for looking!";
        let c = extract(text);
        let got: Vec<(&str, &str)> = c.iter().map(|c| (c.key.as_str(), c.value.as_str())).collect();
        assert_eq!(got, vec![("Shape", "Oval"), ("Cut", "Cabochon"), ("Treatment", "None")]);
    }
}
