//! Incoming deck request model.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered mapping from section name to its bullets.
///
/// Serialized as a JSON object; key order of the source document is kept,
/// which a `HashMap` would lose. Duplicate section names are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections(Vec<(String, Vec<String>)>);

impl Sections {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section, returning `false` if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, bullets: Vec<String>) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.0.push((name, bullets));
        true
    }

    /// Get the bullets of a section by name.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bullets)| bullets.as_slice())
    }

    /// Iterate sections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(n, b)| (n.as_str(), b.as_slice()))
    }

    /// Section names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total bullets across all sections.
    pub fn bullet_count(&self) -> usize {
        self.0.iter().map(|(_, b)| b.len()).sum()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for Sections {
    /// Later duplicates of a name are ignored.
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut sections = Sections::new();
        for (name, bullets) in iter {
            sections.insert(name, bullets);
        }
        sections
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, bullets) in &self.0 {
            map.serialize_entry(name, bullets)?;
        }
        map.end()
    }
}

struct SectionsVisitor;

impl<'de> Visitor<'de> for SectionsVisitor {
    type Value = Sections;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping section names to lists of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Sections, A::Error> {
        let mut sections = Sections(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((name, bullets)) = access.next_entry::<String, Vec<String>>()? {
            if sections.get(&name).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate section name `{name}`"
                )));
            }
            sections.0.push((name, bullets));
        }
        Ok(sections)
    }
}

impl<'de> Deserialize<'de> for Sections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SectionsVisitor)
    }
}

/// A request to build a deck.
///
/// Exactly one of `sections` and `bullets` is expected; the normalizer
/// enforces that, not the deserializer, so both shapes parse and the error
/// can name the offending field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckRequest {
    /// Deck title, shown on the cover slide
    pub title: String,

    /// Named groups of bullets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Sections>,

    /// Legacy flat bullet list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

impl DeckRequest {
    /// Request using the flat bullet form.
    pub fn with_bullets<S: Into<String>>(title: impl Into<String>, bullets: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            sections: None,
            bullets: Some(bullets.into_iter().map(Into::into).collect()),
        }
    }

    /// Request using the section-keyed form.
    pub fn with_sections(title: impl Into<String>, sections: Sections) -> Self {
        Self {
            title: title.into(),
            sections: Some(sections),
            bullets: None,
        }
    }
}
