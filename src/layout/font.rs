//! Body font sizing.

use crate::model::FontSize;

/// Three-tier font scale keyed on how many bullets share a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontScale {
    /// Used when a page has at most `medium_above` bullets
    pub base: FontSize,
    /// Used above `medium_above` bullets
    pub medium: FontSize,
    /// Used above `small_above` bullets
    pub small: FontSize,
    pub medium_above: usize,
    pub small_above: usize,
}

impl FontScale {
    pub const BASE: FontSize = FontSize::points(24);
    pub const MEDIUM: FontSize = FontSize::points(20);
    pub const SMALL: FontSize = FontSize::points(16);

    /// Size for a page holding `count` bullets.
    pub fn size_for(&self, count: usize) -> FontSize {
        if count > self.small_above {
            self.small
        } else if count > self.medium_above {
            self.medium
        } else {
            self.base
        }
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            base: Self::BASE,
            medium: Self::MEDIUM,
            small: Self::SMALL,
            medium_above: 4,
            small_above: 6,
        }
    }
}
