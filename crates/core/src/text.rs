//! Collects the free-text fields of a record for entity extraction.

use crate::types::Record;

/// Ordered, non-empty text blocks of a record.
///
/// Order: long description, short description, outcome summary, then each
/// artwork description as listed. Missing or blank fields are skipped.
pub fn aggregate_texts(record: &Record) -> Vec<&str> {
    let outcome_summary = record
        .outcome
        .as_ref()
        .and_then(|outcome| outcome.summary.as_deref());

    [
        record.description_long.as_deref(),
        record.description_short.as_deref(),
        outcome_summary,
    ]
    .into_iter()
    .chain(
        record
            .artworks
            .iter()
            .map(|artwork| artwork.description.as_deref()),
    )
    .flatten()
    .filter(|text| !text.trim().is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Artwork, Outcome};

    #[test]
    fn collects_fields_in_record_order() {
        let record = Record {
            description_long: Some("long".into()),
            description_short: Some("short".into()),
            outcome: Some(Outcome {
                summary: Some("summary".into()),
            }),
            artworks: vec![
                Artwork {
                    description: Some("art one".into()),
                },
                Artwork {
                    description: Some("art two".into()),
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            aggregate_texts(&record),
            vec!["long", "short", "summary", "art one", "art two"]
        );
    }

    #[test]
    fn skips_missing_and_blank_fields() {
        let record = Record {
            description_long: Some(String::new()),
            description_short: None,
            outcome: Some(Outcome { summary: None }),
            artworks: vec![
                Artwork { description: None },
                Artwork {
                    description: Some("   ".into()),
                },
                Artwork {
                    description: Some("kept".into()),
                },
            ],
            ..Default::default()
        };

        assert_eq!(aggregate_texts(&record), vec!["kept"]);
    }

    #[test]
    fn empty_record_yields_no_blocks() {
        assert!(aggregate_texts(&Record::default()).is_empty());
    }
}
