//! Output rendering for decks other than the `.pptx` itself.
//!
//! # Example
//!
//! ```
//! use deckgen::render::{to_json, JsonFormat};
//! use deckgen::{DeckBuilder, DeckOptions, DeckRequest, Template};
//!
//! let template = Template::builtin()?;
//! let deck = DeckBuilder::new(&template, DeckOptions::default())?
//!     .build(DeckRequest::with_bullets("Plan", ["a", "b"]))?;
//! let json = to_json(&deck, JsonFormat::Compact)?;
//! assert!(json.starts_with('{'));
//! # Ok::<(), deckgen::Error>(())
//! ```

mod json;

pub use json::{to_json, JsonFormat};
