use serde::{Deserialize, Serialize};

/// One listing page as handed over by the candidate locator: the title, the
/// page's raw text and the fragments already located per region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_text: String,
    #[serde(default)]
    pub regions: CandidateRegions,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Fragments per region. A pair with an empty label is a raw fragment
/// ("Color: Blue") still to be split.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRegions {
    pub structured_details: Vec<(String, String)>,
    pub highlights: Vec<(String, String)>,
    pub description: String,
}

impl PageInput {
    /// Nothing to extract from: no title and no page text.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.document_text.trim().is_empty()
    }
}
