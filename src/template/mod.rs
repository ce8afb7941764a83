//! Presentation templates.
//!
//! A [`Template`] is a PresentationML package plus the layouts discovered in
//! it. Decks are written by copying the package and adding slides that
//! reference those layouts.
//!
//! # Example
//!
//! ```no_run
//! use deckgen::template::{LayoutChain, Template};
//!
//! let template = Template::open("corporate.potx")?;
//! let (index, layout) = template.select_layout(&LayoutChain::preferring(1))?;
//! println!("content slides use layout {} ({})", index, layout.name);
//! # Ok::<(), deckgen::Error>(())
//! ```

mod builtin;
mod loader;
mod region;

pub use region::{Capabilities, PlaceholderKind, Region};

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use std::path::Path;

/// A slide layout and its slide-level placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Display name (`p:cSld/@name`)
    pub name: String,
    /// Package part holding the layout XML
    pub part_name: String,
    /// Placeholders copied onto slides, in shape-tree order
    pub regions: Vec<Region>,
}

impl Layout {
    /// Create a layout.
    pub fn new(name: impl Into<String>, part_name: impl Into<String>, regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            part_name: part_name.into(),
            regions,
        }
    }
}

/// One step of a layout fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRef {
    /// Layout at a position in the master's layout list
    Index(usize),
    /// Layout with this display name (case-insensitive)
    Name(String),
    /// Whatever layout comes first
    First,
}

/// Ordered layout references, tried until one resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChain(Vec<LayoutRef>);

impl LayoutChain {
    /// Chain from explicit references.
    pub fn new(refs: impl IntoIterator<Item = LayoutRef>) -> Self {
        Self(refs.into_iter().collect())
    }

    /// The preferred index, then the first layout.
    pub fn preferring(index: usize) -> Self {
        Self(vec![LayoutRef::Index(index), LayoutRef::First])
    }

    /// A named layout, then the preferred index, then the first layout.
    pub fn named_or(name: impl Into<String>, index: usize) -> Self {
        Self(vec![
            LayoutRef::Name(name.into()),
            LayoutRef::Index(index),
            LayoutRef::First,
        ])
    }

    /// The references in order.
    pub fn refs(&self) -> &[LayoutRef] {
        &self.0
    }
}

/// A loaded presentation template.
#[derive(Debug, Clone)]
pub struct Template {
    layouts: Vec<Layout>,
    package: OoxmlContainer,
    presentation_part: String,
}

impl Template {
    /// The embedded default template.
    pub fn builtin() -> Result<Self> {
        Self::from_container(builtin::package())
    }

    /// Load a `.pptx` or `.potx` template from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(OoxmlContainer::open(path)?)
    }

    /// Load a template from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(OoxmlContainer::from_bytes(data)?)
    }

    /// Discover layouts in an opened package.
    pub fn from_container(package: OoxmlContainer) -> Result<Self> {
        let discovered = loader::discover(&package)?;
        Ok(Self {
            layouts: discovered.layouts,
            package,
            presentation_part: discovered.presentation_part,
        })
    }

    /// Template with layouts but no package parts.
    ///
    /// Enough for planning a deck; writing one needs a real package.
    pub fn from_layouts(layouts: Vec<Layout>) -> Self {
        Self {
            layouts,
            package: OoxmlContainer::default(),
            presentation_part: "ppt/presentation.xml".to_string(),
        }
    }

    /// Layouts in master order.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Layout by position.
    pub fn layout(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }

    /// The underlying package.
    pub fn package(&self) -> &OoxmlContainer {
        &self.package
    }

    /// Part name of the main presentation part.
    pub fn presentation_part(&self) -> &str {
        &self.presentation_part
    }

    /// Resolve a fallback chain to a layout.
    pub fn select_layout(&self, chain: &LayoutChain) -> Result<(usize, &Layout)> {
        for (step, layout_ref) in chain.refs().iter().enumerate() {
            let found = match layout_ref {
                LayoutRef::Index(i) => self.layouts.get(*i).map(|l| (*i, l)),
                LayoutRef::Name(name) => self
                    .layouts
                    .iter()
                    .enumerate()
                    .find(|(_, l)| l.name.eq_ignore_ascii_case(name)),
                LayoutRef::First => self.layouts.first().map(|l| (0, l)),
            };
            if let Some((index, layout)) = found {
                if step > 0 {
                    log::debug!(
                        "event=layout_fallback wanted={:?} using_index={} using_name={:?}",
                        chain.refs()[0],
                        index,
                        layout.name
                    );
                }
                return Ok((index, layout));
            }
        }

        Err(Error::Layout(format!(
            "no layout matches {:?} (template has {} layouts)",
            chain.refs(),
            self.layouts.len()
        )))
    }
}
