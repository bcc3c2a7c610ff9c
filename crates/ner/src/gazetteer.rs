//! Offline place recognizer backed by a list of known names.
//!
//! Used when no NER server is configured. Matching is case-sensitive and
//! whole-word; when names overlap at the same position the longest
//! whole-word match wins ("San Luis Río Colorado" over "San Luis").

use std::path::Path;

use async_trait::async_trait;
use placefinder_core::capability::EntityRecognizer;
use placefinder_core::error::ExtractionError;
use placefinder_core::types::{Entity, GPE_LABEL};
use regex::Regex;

use crate::NerError;

#[derive(Debug)]
pub struct GazetteerRecognizer {
    pattern: Regex,
    /// Distinct names, longest first.
    names: Vec<String>,
}

impl GazetteerRecognizer {
    /// Build from place names. Blank names are ignored.
    pub fn from_names<I, S>(names: I) -> Result<Self, NerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        names.dedup();

        if names.is_empty() {
            return Err(NerError::EmptyGazetteer);
        }

        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("(?:{alternation})"))?;

        Ok(Self { pattern, names })
    }

    /// Load a newline-separated name list. Lines starting with `#` are comments.
    pub async fn from_file(path: &Path) -> Result<Self, NerError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NerError::Gazetteer {
                path: path.display().to_string(),
                source,
            })?;
        let recognizer = Self::from_names(
            contents
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        )?;
        tracing::info!(
            path = %path.display(),
            names = recognizer.name_count(),
            "Gazetteer loaded",
        );
        Ok(recognizer)
    }

    /// Number of distinct names in the gazetteer.
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Place names found in `text`, in order of appearance.
    pub fn find_places<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.pattern.find_at(text, pos) {
            let start = m.start();
            match self.bounded_match_end(text, start) {
                Some(end) => {
                    found.push(&text[start..end]);
                    pos = end;
                }
                None => pos = next_char_boundary(text, start),
            }
            if pos >= text.len() {
                break;
            }
        }

        found
    }

    /// End of the longest name starting at `start` that stands as whole words.
    fn bounded_match_end(&self, text: &str, start: usize) -> Option<usize> {
        let rest = &text[start..];
        self.names
            .iter()
            .filter(|name| rest.starts_with(name.as_str()))
            .map(|name| start + name.len())
            .find(|&end| is_word_bounded(text, start, end))
    }
}

#[async_trait]
impl EntityRecognizer for GazetteerRecognizer {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        Ok(self
            .find_places(text)
            .into_iter()
            .map(|place| Entity::new(place, GPE_LABEL))
            .collect())
    }
}

/// A match must not run into a word character on either side.
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map_or(text.len(), |c| from + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn gazetteer(names: &[&str]) -> GazetteerRecognizer {
        GazetteerRecognizer::from_names(names.iter().copied()).unwrap()
    }

    #[test]
    fn finds_places_in_text_order() {
        let g = gazetteer(&["Tucson", "Nogales", "Ajo"]);
        assert_eq!(
            g.find_places("From Nogales to Tucson, then Ajo."),
            vec!["Nogales", "Tucson", "Ajo"]
        );
    }

    #[test]
    fn requires_whole_words() {
        let g = gazetteer(&["Ajo"]);
        assert!(g.find_places("Major works in Ajoville").is_empty());
        assert_eq!(g.find_places("Ajo, AZ"), vec!["Ajo"]);
    }

    #[test]
    fn prefers_longest_name_at_same_position() {
        let g = gazetteer(&["San Luis", "San Luis Río Colorado"]);
        assert_eq!(
            g.find_places("Workshops in San Luis Río Colorado and San Luis."),
            vec!["San Luis Río Colorado", "San Luis"]
        );
    }

    #[test]
    fn matches_names_with_punctuation_and_accents() {
        let g = gazetteer(&["U.S.", "Álamos"]);
        assert_eq!(
            g.find_places("Across the U.S. border to Álamos"),
            vec!["U.S.", "Álamos"]
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let g = gazetteer(&["Tubac"]);
        assert!(g.find_places("tubac").is_empty());
    }

    #[test]
    fn repeated_mentions_are_all_reported() {
        let g = gazetteer(&["Ajo"]);
        assert_eq!(g.find_places("Ajo and Ajo"), vec!["Ajo", "Ajo"]);
    }

    #[test]
    fn empty_name_list_is_rejected() {
        assert_matches!(
            GazetteerRecognizer::from_names(["", "  "]),
            Err(NerError::EmptyGazetteer)
        );
    }

    #[test]
    fn shorter_name_is_tried_when_longest_runs_into_a_word() {
        let g = gazetteer(&["Ajo", "Ajo Blanco"]);
        assert_eq!(g.find_places("Ajo Blancos mural"), vec!["Ajo"]);
        assert_eq!(g.find_places("Ajo Blanco mural"), vec!["Ajo Blanco"]);
    }

    #[tokio::test]
    async fn from_file_skips_comments_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Sonora\nHermosillo\n\nCaborca\nHermosillo").unwrap();

        let g = GazetteerRecognizer::from_file(file.path()).await.unwrap();
        assert_eq!(g.name_count(), 2);
        assert_eq!(g.find_places("Caborca"), vec!["Caborca"]);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = GazetteerRecognizer::from_file(Path::new("/nonexistent/places.txt"))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/places.txt"));
    }

    #[tokio::test]
    async fn entities_are_labeled_gpe() {
        let g = gazetteer(&["Sasabe"]);
        let entities = g.extract_entities("Sasabe port of entry").await.unwrap();
        assert_eq!(entities, vec![Entity::new("Sasabe", "GPE")]);
    }
}
