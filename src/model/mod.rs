//! Request and deck models.
//!
//! A [`DeckRequest`] is what callers submit; a [`RenderedDeck`] is what the
//! builder produces from it and the writer serializes to a package.

mod deck;
mod request;

pub use deck::*;
pub use request::*;
