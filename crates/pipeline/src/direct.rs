//! Direct geocoding of candidate place names.

use placefinder_core::capability::Geocoder;
use placefinder_core::config::ResolverConfig;
use placefinder_core::error::LookupFailure;
use placefinder_core::types::GeocodeHit;

use crate::rate_limit::RateLimiter;

/// Outcome of the direct stage for one record.
#[derive(Debug, Clone, Default)]
pub struct DirectResolution {
    /// First hit with an accepted granularity, if any.
    pub hit: Option<GeocodeHit>,
    /// Number of forward requests issued.
    pub attempts: usize,
}

/// Tries candidates in order until one geocodes to an accepted granularity.
pub struct GeocodeResolver<'a> {
    geocoder: &'a dyn Geocoder,
    limiter: &'a dyn RateLimiter,
    config: &'a ResolverConfig,
}

impl<'a> GeocodeResolver<'a> {
    pub fn new(
        geocoder: &'a dyn Geocoder,
        limiter: &'a dyn RateLimiter,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            geocoder,
            limiter,
            config,
        }
    }

    /// One request per candidate, each followed by a rate-limit pause.
    ///
    /// Failures and rejected granularities move on to the next candidate;
    /// exhausting the list is not an error.
    pub async fn resolve(&self, record: &str, candidates: &[String]) -> DirectResolution {
        let mut attempts = 0;

        for candidate in candidates {
            let query = self.config.forward_query(candidate);
            attempts += 1;

            let outcome = self.attempt(record, &query).await;
            self.limiter.pause().await;

            match outcome {
                Ok(hit) => {
                    tracing::debug!(
                        record,
                        candidate = %candidate,
                        place_type = %hit.place_type,
                        "Direct geocode accepted",
                    );
                    return DirectResolution {
                        hit: Some(hit),
                        attempts,
                    };
                }
                Err(reason) => {
                    tracing::debug!(
                        record,
                        candidate = %candidate,
                        reason = %reason,
                        "Direct geocode candidate skipped",
                    );
                }
            }
        }

        DirectResolution {
            hit: None,
            attempts,
        }
    }

    async fn attempt(&self, record: &str, query: &str) -> Result<GeocodeHit, LookupFailure> {
        match self.geocoder.forward(query).await {
            Ok(Some(hit)) if hit.display_name.trim().is_empty() => Err(LookupFailure::EmptyResult),
            Ok(Some(hit)) if self.config.accepts_type(&hit.place_type) => Ok(hit),
            Ok(Some(_)) => Err(LookupFailure::RejectedGranularity),
            Ok(None) => Err(LookupFailure::EmptyResult),
            Err(e) => {
                tracing::warn!(record, query, error = %e, "Forward geocode request failed");
                Err(LookupFailure::RequestFailure)
            }
        }
    }
}
