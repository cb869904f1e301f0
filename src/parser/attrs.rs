use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key holding the listing's image URLs.
pub const IMAGES_KEY: &str = "images";
pub const MAX_IMAGES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::List(_) => None,
        }
    }
}

/// Ordered attribute-name → value mapping. Insertion order is preserved and
/// no key ever maps to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, AttrValue>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(AttrValue::as_text)
    }

    pub fn images(&self) -> &[String] {
        match self.0.get(IMAGES_KEY) {
            Some(AttrValue::List(urls)) => urls,
            _ => &[],
        }
    }

    /// First-writer-wins insert. Returns false when the key is taken or
    /// either side is blank after trimming.
    pub fn insert_if_absent(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() || key == IMAGES_KEY || self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), AttrValue::Text(value.to_string()));
        true
    }

    /// Overwrites in place, or appends when the key is new.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove(key);
            return;
        }
        self.0.insert(key.to_string(), AttrValue::Text(value.to_string()));
    }

    pub fn set_images(&mut self, urls: &[String]) {
        let urls: Vec<String> = urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .take(MAX_IMAGES)
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            self.0.shift_remove(IMAGES_KEY);
        } else {
            self.0.insert(IMAGES_KEY.to_string(), AttrValue::List(urls));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.shift_remove(key)
    }

    /// Moves `from` to `to` keeping its position. No-op if `from` is absent
    /// or `to` already exists.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to || self.0.contains_key(to) {
            return false;
        }
        match self.0.shift_remove_full(from) {
            Some((idx, _, value)) => {
                self.0.shift_insert(idx, to.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Text-valued entries in insertion order (images skipped).
    pub fn text_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_text().map(|t| (k.as_str(), t)))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ── Tests ──
