//! Entity-recognizer adapters.
//!
//! [`HttpEntityRecognizer`] talks to an external NER model server;
//! [`GazetteerRecognizer`] matches a fixed list of known place names
//! offline. Both implement [`placefinder_core::capability::EntityRecognizer`].

pub mod gazetteer;
pub mod http;

pub use gazetteer::GazetteerRecognizer;
pub use http::HttpEntityRecognizer;

/// Errors raised while building or calling a recognizer.
#[derive(Debug, thiserror::Error)]
pub enum NerError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The NER server returned a non-2xx status code.
    #[error("NER server error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to read gazetteer {path}: {source}")]
    Gazetteer {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Gazetteer contains no place names")]
    EmptyGazetteer,

    #[error("Invalid gazetteer pattern: {0}")]
    Pattern(#[from] regex::Error),
}
