use placefinder_core::error::{CoreError, ExtractionError};

/// Fatal pipeline errors. Any of these aborts the run.
///
/// Per-record geocoding failures are not represented here; they degrade to
/// the next fallback stage instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Invalid resolver configuration: {0}")]
    Config(#[from] CoreError),

    #[error("Failed to read records from {path}: {source}")]
    ReadStore {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record file {path}: {source}")]
    ParseStore {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write results to {path}: {source}")]
    WriteStore {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}
