use super::{Candidate, SourceRegion};
use crate::parser::dictionary::{TermDictionary, Vocabulary};
use crate::parser::patterns;

pub const SIZE: &str = "Size";

/// Dictionary and numeric-pattern values found anywhere in the title or
/// description. Lowest precedence of the located regions: these only fill
/// keys nothing else supplied.
pub fn extract(title: &str, description: &str, vocab: &Vocabulary) -> Vec<Candidate> {
    let text = format!("{} {}", title, description);
    let mut out = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        if let Some(v) = value {
            out.push(Candidate::new(key, v, SourceRegion::Title));
        }
    };

    let lookup = |dict: &TermDictionary| dict.lookup(&text).map(str::to_string);

    let metal = lookup(&vocab.metals);
    let material = lookup(&vocab.materials)
        .filter(|m| !metal.as_deref().is_some_and(|metal| metal.eq_ignore_ascii_case(m)));

    push("Gemstone Name", lookup(&vocab.gemstones));
    push("Metal", metal);
    push("Material", material);
    push("Type", lookup(&vocab.product_types));
    push("Color", lookup(&vocab.colors));

    // a "10 x 8 mm" match would otherwise also yield Size "8 mm"
    match patterns::dimensions(&text) {
        Some(d) => push("Dimensions", Some(d)),
        None => push(SIZE, patterns::size(&text)),
    }
    push("Weight", patterns::weight(&text));
    push("Carat Weight", patterns::carat_weight(&text));
    push("Ring Size", patterns::ring_size(&text));

    out
}
