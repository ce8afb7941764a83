//! # deckgen
//!
//! Generate PowerPoint decks from a title and bullet content.
//!
//! A request names a deck title and either a flat bullet list or named
//! sections of bullets. The builder lays it out as a cover slide followed by
//! content slides, splitting long sections across pages and shrinking the
//! font as pages fill up. The writer serializes the result against a
//! PresentationML template into a `.pptx` package.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckgen::{ArtifactStore, DeckOptions, DeckRequest, Template};
//!
//! let template = Template::builtin()?;
//! let store = ArtifactStore::open("public")?;
//! let request = DeckRequest::with_bullets("Q1 Report", ["Revenue up", "Costs flat"]);
//!
//! let artifact = deckgen::generate(request, &template, &DeckOptions::default(), &store)?;
//! println!("wrote {}", artifact.path.display());
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! ## Step by Step
//!
//! ```
//! use deckgen::layout::{DeckBuilder, DeckOptions};
//! use deckgen::writer::PackageWriter;
//! use deckgen::{DeckRequest, Template};
//!
//! let template = Template::builtin()?;
//! let builder = DeckBuilder::new(&template, DeckOptions::default().with_max_per_slide(4))?;
//! let deck = builder.build(DeckRequest::with_bullets("Plan", ["a", "b", "c", "d", "e"]))?;
//! assert_eq!(deck.slide_count(), 3);
//!
//! let bytes = PackageWriter::new(&template).to_bytes(&deck)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! ## Features
//!
//! - `server` (default): the Rocket HTTP service in [`server`]

pub mod container;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod storage;
pub mod template;
pub mod writer;
mod xml;

#[cfg(feature = "server")]
pub mod server;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use layout::{DeckBuilder, DeckOptions, FontScale};
pub use model::{BulletLine, DeckRequest, FontSize, RenderedDeck, Sections, Slide, SlideKind};
pub use storage::{Artifact, ArtifactStore};
pub use template::{Layout, LayoutChain, LayoutRef, Template};
pub use writer::PackageWriter;
pub use xml::{escape_xml, sanitize_text};

/// Build a deck for `request` and store it as a new artifact.
///
/// Nothing is written unless the whole deck builds.
pub fn generate(
    request: DeckRequest,
    template: &Template,
    options: &DeckOptions,
    store: &ArtifactStore,
) -> Result<Artifact> {
    let deck = DeckBuilder::new(template, options.clone())?.build(request)?;
    let artifact = store.save(&PackageWriter::new(template), &deck)?;
    log::info!(
        "event=deck_generated file={} slides={} bullets={}",
        artifact.file_name,
        deck.slide_count(),
        deck.bullet_count()
    );
    Ok(artifact)
}

/// Build a deck in memory and return the `.pptx` bytes.
///
/// # Example
///
/// ```
/// use deckgen::{DeckOptions, DeckRequest, Template};
///
/// let template = Template::builtin()?;
/// let bytes = deckgen::generate_bytes(
///     DeckRequest::with_bullets("Q1 Report", ["a", "b", "c"]),
///     &template,
///     &DeckOptions::default(),
/// )?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), deckgen::Error>(())
/// ```
pub fn generate_bytes(request: DeckRequest, template: &Template, options: &DeckOptions) -> Result<Vec<u8>> {
    let deck = DeckBuilder::new(template, options.clone())?.build(request)?;
    PackageWriter::new(template).to_bytes(&deck)
}

/// Library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
