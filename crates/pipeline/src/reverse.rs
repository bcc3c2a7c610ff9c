//! Reverse-geocoding fallback for records that already carry a coordinate.

use placefinder_core::capability::Geocoder;
use placefinder_core::config::ResolverConfig;
use placefinder_core::error::LookupFailure;
use placefinder_core::types::Coordinate;

use crate::rate_limit::RateLimiter;

pub struct ReverseResolver<'a> {
    geocoder: &'a dyn Geocoder,
    limiter: &'a dyn RateLimiter,
    config: &'a ResolverConfig,
}

impl<'a> ReverseResolver<'a> {
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

    /// Name the place enclosing `coordinate`, returning the name together
    /// with the unchanged coordinate.
    ///
    /// Without a coordinate nothing is requested and no pause is taken.
    /// Otherwise exactly one request is made, followed by one pause.
    pub async fn resolve(
        &self,
        record: &str,
        coordinate: Option<Coordinate>,
    ) -> Result<(String, Coordinate), LookupFailure> {
        let coordinate = coordinate.ok_or(LookupFailure::NoCoordinateForReverse)?;

        let response = self
            .geocoder
            .reverse(coordinate, self.config.reverse_zoom)
            .await;
        self.limiter.pause().await;

        match response {
            Ok(Some(hit)) => hit
                .best_name(&self.config.address_preference[..])
                .map(|name| (name, coordinate))
                .ok_or(LookupFailure::EmptyResult),
            Ok(None) => Err(LookupFailure::EmptyResult),
            Err(e) => {
                tracing::warn!(
                    record,
                    lat = coordinate.lat,
                    lon = coordinate.lon,
                    error = %e,
                    "Reverse geocode request failed",
                );
                Err(LookupFailure::RequestFailure)
            }
        }
    }
}
