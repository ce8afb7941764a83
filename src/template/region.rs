//! Placeholder regions of a slide layout.

use bitflags::bitflags;

bitflags! {
    /// What a region can hold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Receives the slide title
        const TITLE = 1;
        /// Carries a text frame
        const TEXT = 1 << 1;
        /// Hosts pictures, charts, tables or media
        const GRAPHIC = 1 << 2;
    }
}

/// Placeholder type, from the `type` attribute of `p:ph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// Generic content placeholder; the attribute default
    Object,
    Picture,
    Chart,
    Table,
    Diagram,
    Media,
    ClipArt,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Header,
}

impl PlaceholderKind {
    /// Map a `p:ph/@type` value. A missing attribute means `obj`.
    pub fn from_ooxml(value: Option<&str>) -> Self {
        match value.unwrap_or("obj") {
            "title" => PlaceholderKind::Title,
            "ctrTitle" => PlaceholderKind::CenterTitle,
            "subTitle" => PlaceholderKind::Subtitle,
            "body" => PlaceholderKind::Body,
            "pic" => PlaceholderKind::Picture,
            "chart" => PlaceholderKind::Chart,
            "tbl" => PlaceholderKind::Table,
            "dgm" => PlaceholderKind::Diagram,
            "media" => PlaceholderKind::Media,
            "clipArt" => PlaceholderKind::ClipArt,
            "sldImg" => PlaceholderKind::SlideImage,
            "dt" => PlaceholderKind::Date,
            "ftr" => PlaceholderKind::Footer,
            "sldNum" => PlaceholderKind::SlideNumber,
            "hdr" => PlaceholderKind::Header,
            _ => PlaceholderKind::Object,
        }
    }

    /// Value for `p:ph/@type`; `None` for the default `obj`.
    pub fn as_ooxml(self) -> Option<&'static str> {
        match self {
            PlaceholderKind::Title => Some("title"),
            PlaceholderKind::CenterTitle => Some("ctrTitle"),
            PlaceholderKind::Subtitle => Some("subTitle"),
            PlaceholderKind::Body => Some("body"),
            PlaceholderKind::Object => None,
            PlaceholderKind::Picture => Some("pic"),
            PlaceholderKind::Chart => Some("chart"),
            PlaceholderKind::Table => Some("tbl"),
            PlaceholderKind::Diagram => Some("dgm"),
            PlaceholderKind::Media => Some("media"),
            PlaceholderKind::ClipArt => Some("clipArt"),
            PlaceholderKind::SlideImage => Some("sldImg"),
            PlaceholderKind::Date => Some("dt"),
            PlaceholderKind::Footer => Some("ftr"),
            PlaceholderKind::SlideNumber => Some("sldNum"),
            PlaceholderKind::Header => Some("hdr"),
        }
    }

    /// Capabilities a slide instance of this placeholder has.
    pub fn capabilities(self) -> Capabilities {
        match self {
            PlaceholderKind::Title | PlaceholderKind::CenterTitle => {
                Capabilities::TITLE | Capabilities::TEXT
            }
            PlaceholderKind::Subtitle | PlaceholderKind::Body => Capabilities::TEXT,
            PlaceholderKind::Object => Capabilities::TEXT | Capabilities::GRAPHIC,
            PlaceholderKind::Picture
            | PlaceholderKind::Chart
            | PlaceholderKind::Table
            | PlaceholderKind::Diagram
            | PlaceholderKind::Media
            | PlaceholderKind::ClipArt
            | PlaceholderKind::SlideImage => Capabilities::GRAPHIC,
            PlaceholderKind::Date
            | PlaceholderKind::Footer
            | PlaceholderKind::SlideNumber
            | PlaceholderKind::Header => Capabilities::empty(),
        }
    }

    /// Whether slides created from a layout get a copy of this placeholder.
    ///
    /// Date, footer, slide number and header stay on the layout.
    pub fn is_cloned_to_slide(self) -> bool {
        !matches!(
            self,
            PlaceholderKind::Date
                | PlaceholderKind::Footer
                | PlaceholderKind::SlideNumber
                | PlaceholderKind::Header
        )
    }

    /// Base of the shape name given to slide copies.
    pub fn shape_name(self) -> &'static str {
        match self {
            PlaceholderKind::Title | PlaceholderKind::CenterTitle => "Title",
            PlaceholderKind::Subtitle => "Subtitle",
            PlaceholderKind::Body => "Text Placeholder",
            PlaceholderKind::Object => "Content Placeholder",
            PlaceholderKind::Picture => "Picture Placeholder",
            PlaceholderKind::Chart => "Chart Placeholder",
            PlaceholderKind::Table => "Table Placeholder",
            _ => "Placeholder",
        }
    }
}

/// One placeholder of a layout, as it appears on slides built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Shape name on the layout
    pub name: String,
    /// Placeholder type
    pub kind: PlaceholderKind,
    /// Placeholder index (`p:ph/@idx`)
    pub idx: Option<u32>,
    /// Whether the layout shape carries a `p:txBody`
    pub has_text_frame: bool,
}

impl Region {
    /// Create a region.
    pub fn new(kind: PlaceholderKind, idx: Option<u32>) -> Self {
        Self {
            name: kind.shape_name().to_string(),
            kind,
            idx,
            has_text_frame: kind.capabilities().contains(Capabilities::TEXT),
        }
    }

    /// Set the layout shape name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Capability set of this region.
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Check whether the region holds a slide title.
    pub fn is_title(&self) -> bool {
        self.capabilities().contains(Capabilities::TITLE)
    }

    /// Check whether the region can hold text.
    pub fn accepts_text(&self) -> bool {
        self.capabilities().contains(Capabilities::TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for value in ["title", "ctrTitle", "subTitle", "body", "pic", "dt", "sldNum"] {
            let kind = PlaceholderKind::from_ooxml(Some(value));
            assert_eq!(kind.as_ooxml(), Some(value));
        }
        assert_eq!(PlaceholderKind::from_ooxml(None), PlaceholderKind::Object);
        assert_eq!(PlaceholderKind::Object.as_ooxml(), None);
    }

    #[test]
    fn test_capabilities() {
        assert!(Region::new(PlaceholderKind::CenterTitle, None).is_title());
        assert!(Region::new(PlaceholderKind::Title, None).accepts_text());
        assert!(Region::new(PlaceholderKind::Object, Some(1)).accepts_text());
        assert!(!Region::new(PlaceholderKind::Object, Some(1)).is_title());
        assert!(!Region::new(PlaceholderKind::Picture, Some(1)).accepts_text());
        assert!(!PlaceholderKind::Footer.is_cloned_to_slide());
        assert!(PlaceholderKind::Subtitle.is_cloned_to_slide());
    }
}
