//! Error taxonomy shared by every crate in the workspace.
//!
//! Only [`ExtractionError`] is fatal to a run. [`GeocodeError`] is an
//! expected outcome of talking to a remote service and is downgraded to
//! "no hit" by the resolvers; [`LookupFailure`] names why a fallback stage
//! produced nothing so it can be logged consistently.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure of the entity-recognition capability.
///
/// Either variant aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// No entity model could be loaded or reached.
    #[error("Entity model unavailable: {0}")]
    Unavailable(String),

    /// The model was reachable but could not process a text block.
    #[error("Entity extraction failed: {0}")]
    Failed(String),
}

/// Failure of a single request against the geocoding capability.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Geocode request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status code.
    #[error("Geocoding service error ({status}): {body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered but the body could not be interpreted.
    #[error("Malformed geocode response: {0}")]
    Decode(String),
}

/// Why a resolution stage yielded nothing for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// The request failed or the service returned an error status.
    RequestFailure,
    /// The service responded but found nothing.
    EmptyResult,
    /// A hit was returned but its granularity is not accepted.
    RejectedGranularity,
    /// The record has no coordinate to reverse-geocode.
    NoCoordinateForReverse,
}

impl LookupFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestFailure => "request_failure",
            Self::EmptyResult => "empty_result",
            Self::RejectedGranularity => "rejected_granularity",
            Self::NoCoordinateForReverse => "no_coordinate",
        }
    }
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
