//! Rendered deck structures.

use serde::{Deserialize, Serialize};

/// A font size in whole points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(u32);

impl FontSize {
    /// Create a font size from points.
    pub const fn points(pt: u32) -> Self {
        Self(pt)
    }

    /// Size in points.
    pub const fn as_points(self) -> u32 {
        self.0
    }

    /// Size in hundredths of a point, as DrawingML `sz` expects.
    pub const fn as_centipoints(self) -> u32 {
        self.0 * 100
    }
}

/// Role of a slide within the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// First slide, carrying the deck title only
    Cover,
    /// One page of a section's bullets
    Content,
}

/// One paragraph in a slide body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletLine {
    /// Paragraph text
    pub text: String,
    /// Run font size
    pub font_size: FontSize,
    /// Indent level (0 = top level)
    #[serde(default)]
    pub level: u8,
}

impl BulletLine {
    /// Create a top-level bullet.
    pub fn new(text: impl Into<String>, font_size: FontSize) -> Self {
        Self {
            text: text.into(),
            font_size,
            level: 0,
        }
    }
}

/// A slide instantiated from a template layout.
///
/// Region indices point into the layout's region list; the writer uses them
/// to decide which placeholder receives the title and which the bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Cover or content
    pub kind: SlideKind,

    /// Slide title text
    pub title: String,

    /// Index of the layout in the template
    pub layout: usize,

    /// Layout display name
    pub layout_name: String,

    /// Region receiving the title, if the layout has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_region: Option<usize>,

    /// Region receiving the bullets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_region: Option<usize>,

    /// Body paragraphs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<BulletLine>,
}

impl Slide {
    /// Font size shared by the body paragraphs, if any.
    pub fn body_font_size(&self) -> Option<FontSize> {
        self.bullets.first().map(|b| b.font_size)
    }
}

/// A complete deck, ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDeck {
    /// Deck title
    pub title: String,

    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl RenderedDeck {
    /// Create an empty deck.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides, cover included.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Content slides in order.
    pub fn content_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| s.kind == SlideKind::Content)
    }

    /// Total bullet lines across the deck.
    pub fn bullet_count(&self) -> usize {
        self.slides.iter().map(|s| s.bullets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(title: &str, bullets: &[&str]) -> Slide {
        Slide {
            kind: SlideKind::Content,
            title: title.to_string(),
            layout: 1,
            layout_name: "Title and Content".to_string(),
            title_region: Some(0),
            body_region: Some(1),
            bullets: bullets
                .iter()
                .map(|b| BulletLine::new(*b, FontSize::points(24)))
                .collect(),
        }
    }

    #[test]
    fn test_font_size_units() {
        let size = FontSize::points(20);
        assert_eq!(size.as_points(), 20);
        assert_eq!(size.as_centipoints(), 2000);
    }

    #[test]
    fn test_deck_counts() {
        let mut deck = RenderedDeck::new("Deck");
        deck.add_slide(Slide {
            kind: SlideKind::Cover,
            title: "Deck".to_string(),
            layout: 0,
            layout_name: "Title Slide".to_string(),
            title_region: Some(0),
            body_region: None,
            bullets: Vec::new(),
        });
        deck.add_slide(content("A", &["1", "2"]));
        deck.add_slide(content("B", &["3"]));

        assert_eq!(deck.slide_count(), 3);
        assert_eq!(deck.content_slides().count(), 2);
        assert_eq!(deck.bullet_count(), 3);
        assert_eq!(deck.slides[1].body_font_size(), Some(FontSize::points(24)));
        assert_eq!(deck.slides[0].body_font_size(), None);
    }

    #[test]
    fn test_slide_serialization() {
        let json = serde_json::to_string(&content("A", &["x"])).unwrap();
        assert!(json.contains("\"kind\":\"content\""));
        assert!(json.contains("\"font_size\":24"));
    }
}
