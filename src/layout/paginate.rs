//! Splitting bullet lists into slide-sized pages.

use crate::error::{Error, Result};

/// Default bullets per content slide.
pub const DEFAULT_MAX_PER_SLIDE: usize = 5;

/// Split `bullets` into contiguous pages of at most `max_per_slide` items.
///
/// An empty list yields no pages. A zero page size is a configuration error.
pub fn paginate<T>(bullets: &[T], max_per_slide: usize) -> Result<Vec<&[T]>> {
    if max_per_slide == 0 {
        return Err(Error::Config("max_per_slide must be at least 1".to_string()));
    }
    Ok(bullets.chunks(max_per_slide).collect())
}

/// Title for page `index` (0-based) of `total` pages of a section.
pub fn page_title(section: &str, index: usize, total: usize) -> String {
    if total <= 1 {
        section.to_string()
    } else {
        format!("{} ({}/{})", section, index + 1, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_exact_and_remainder() {
        let items: Vec<u32> = (1..=7).collect();
        let pages = paginate(&items, 5).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], &[1, 2, 3, 4, 5]);
        assert_eq!(pages[1], &[6, 7]);

        let pages = paginate(&items[..5], 5).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_empty_yields_no_pages() {
        let items: Vec<String> = Vec::new();
        assert!(paginate(&items, 5).unwrap().is_empty());
    }

    #[test]
    fn test_zero_page_size() {
        assert!(matches!(paginate(&[1], 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("Risks", 0, 1), "Risks");
        assert_eq!(page_title("Risks", 0, 2), "Risks (1/2)");
        assert_eq!(page_title("Risks", 1, 2), "Risks (2/2)");
    }
}
