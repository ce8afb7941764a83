//! Turning requests into slide sequences.
//!
//! The pipeline is normalize → paginate → size fonts → resolve regions,
//! driven by [`DeckBuilder`]. Nothing here touches the filesystem; the
//! result is a [`RenderedDeck`](crate::model::RenderedDeck) that the writer
//! serializes.

mod builder;
mod font;
mod normalize;
mod options;
mod paginate;
mod placeholder;

pub use builder::DeckBuilder;
pub use font::FontScale;
pub use normalize::{normalize, DeckOutline};
pub use options::{DeckOptions, DEFAULT_SECTION};
pub use paginate::{page_title, paginate, DEFAULT_MAX_PER_SLIDE};
pub use placeholder::{find_title, resolve_body};
