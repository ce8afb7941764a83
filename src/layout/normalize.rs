//! Request normalization.

use crate::error::{Error, Result};
use crate::model::{DeckRequest, Sections};

/// A validated request: a non-blank title and section-keyed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOutline {
    /// Deck title
    pub title: String,
    /// Sections in request order
    pub sections: Sections,
}

/// Turn either request shape into a [`DeckOutline`].
///
/// A flat `bullets` list becomes one section named `default_section`.
pub fn normalize(request: DeckRequest, default_section: &str) -> Result<DeckOutline> {
    if request.title.trim().is_empty() {
        return Err(Error::validation("title", "title must not be blank"));
    }

    let sections = match (request.sections, request.bullets) {
        (Some(sections), None) => sections,
        (None, Some(bullets)) => {
            let mut sections = Sections::new();
            sections.insert(default_section, bullets);
            sections
        }
        (Some(_), Some(_)) => {
            return Err(Error::validation(
                "sections",
                "supply either `sections` or `bullets`, not both",
            ))
        }
        (None, None) => {
            return Err(Error::validation(
                "sections",
                "supply either `sections` or `bullets`",
            ))
        }
    };

    Ok(DeckOutline {
        title: request.title,
        sections,
    })
}
