//! Capability queries over a layout's regions.

use crate::error::{Error, Result};
use crate::template::Region;

/// Index of the first title-capable region.
pub fn find_title(regions: &[Region]) -> Option<usize> {
    regions.iter().position(Region::is_title)
}

/// Index of the first text region that is not the title region.
pub fn resolve_body(regions: &[Region], title: Option<usize>) -> Result<usize> {
    regions
        .iter()
        .enumerate()
        .find(|(i, r)| Some(*i) != title && !r.is_title() && r.accepts_text())
        .map(|(i, _)| i)
        .ok_or_else(|| Error::Layout("no content region available".to_string()))
}
