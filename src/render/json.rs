//! JSON summary of a rendered deck.

use crate::error::{Error, Result};
use crate::model::RenderedDeck;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a deck to JSON.
pub fn to_json(deck: &RenderedDeck, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Compact => serde_json::to_string(deck),
        JsonFormat::Pretty => serde_json::to_string_pretty(deck),
    };
    result.map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DeckBuilder, DeckOptions};
    use crate::model::DeckRequest;
    use crate::template::Template;

    fn deck() -> RenderedDeck {
        let template = Template::builtin().unwrap();
        DeckBuilder::new(&template, DeckOptions::default())
            .unwrap()
            .build(DeckRequest::with_bullets("Test", ["Hello"]))
            .unwrap()
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&deck(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"text\": \"Hello\""));
        assert!(json.contains("\"kind\": \"cover\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&deck(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"layout_name\":\"Title and Content\""));
    }

    #[test]
    fn test_deck_roundtrip() {
        let original = deck();
        let json = to_json(&original, JsonFormat::default()).unwrap();
        let parsed: RenderedDeck = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
