//! Deck building options.

use super::font::FontScale;
use super::paginate::DEFAULT_MAX_PER_SLIDE;
use crate::error::{Error, Result};
use crate::template::LayoutChain;

/// Section name used for the flat `bullets` request form.
pub const DEFAULT_SECTION: &str = "General";

/// Options for building decks.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    /// Maximum bullets on one content slide
    pub max_per_slide: usize,

    /// Section name for flat bullet lists
    pub default_section: String,

    /// Layout chain for the cover slide
    pub cover_layout: LayoutChain,

    /// Layout chain for content slides
    pub content_layout: LayoutChain,

    /// Body font sizing
    pub font_scale: FontScale,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            max_per_slide: DEFAULT_MAX_PER_SLIDE,
            default_section: DEFAULT_SECTION.to_string(),
            cover_layout: LayoutChain::preferring(0),
            content_layout: LayoutChain::preferring(1),
            font_scale: FontScale::default(),
        }
    }
}

impl DeckOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_max_per_slide(mut self, max: usize) -> Self {
        self.max_per_slide = max;
        self
    }

    /// Set the section name for flat bullet lists.
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Set the cover slide layout chain.
    pub fn with_cover_layout(mut self, chain: LayoutChain) -> Self {
        self.cover_layout = chain;
        self
    }

    /// Set the content slide layout chain.
    pub fn with_content_layout(mut self, chain: LayoutChain) -> Self {
        self.content_layout = chain;
        self
    }

    /// Set the font scale.
    pub fn with_font_scale(mut self, scale: FontScale) -> Self {
        self.font_scale = scale;
        self
    }

    /// Check the options for values that cannot produce a deck.
    pub fn validate(&self) -> Result<()> {
        if self.max_per_slide == 0 {
            return Err(Error::Config("max_per_slide must be at least 1".to_string()));
        }
        if self.default_section.trim().is_empty() {
            return Err(Error::Config("default section name must not be blank".to_string()));
        }
        if self.font_scale.medium_above > self.font_scale.small_above {
            return Err(Error::Config(format!(
                "font scale thresholds out of order ({} > {})",
                self.font_scale.medium_above, self.font_scale.small_above
            )));
        }
        Ok(())
    }
}
