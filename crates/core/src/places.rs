//! Place-name extraction from text blocks.

use std::collections::HashSet;

use crate::capability::EntityRecognizer;
use crate::error::ExtractionError;

/// Run every block through the recognizer and collect place entities.
///
/// Results are concatenated in block order, entity order within a block.
/// Duplicates are kept; see [`dedupe_preserving_order`].
pub async fn extract_places(
    recognizer: &dyn EntityRecognizer,
    texts: &[&str],
) -> Result<Vec<String>, ExtractionError> {
    let mut places = Vec::new();

    for text in texts {
        let entities = recognizer.extract_entities(text).await?;
        places.extend(
            entities
                .into_iter()
                .filter(|entity| entity.is_place())
                .map(|entity| entity.text.trim().to_string()),
        );
    }

    Ok(places)
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn dedupe_preserving_order(places: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| seen.insert(place.clone()))
        .collect()
}
