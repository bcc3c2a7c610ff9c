//! REST client for a Nominatim-compatible geocoding service.
//!
//! Wraps `/search` (forward) and `/reverse` using [`reqwest`] and exposes
//! them through the [`Geocoder`] capability. The client never retries and
//! never sleeps; pacing is the caller's job.

use std::time::Duration;

use async_trait::async_trait;
use placefinder_core::capability::Geocoder;
use placefinder_core::error::GeocodeError;
use placefinder_core::types::{Coordinate, GeocodeHit, ReverseHit};

use crate::messages::{ReversePlace, SearchPlace};

/// Public OpenStreetMap instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// HTTP request timeout for a single lookup.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a single Nominatim instance.
pub struct NominatimApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the Nominatim REST layer.
#[derive(Debug, thiserror::Error)]
pub enum NominatimError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Nominatim returned a non-2xx status code.
    #[error("Nominatim API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<NominatimError> for GeocodeError {
    fn from(err: NominatimError) -> Self {
        match err {
            NominatimError::Request(e) if e.is_decode() => GeocodeError::Decode(e.to_string()),
            NominatimError::Request(e) => GeocodeError::Request(e.to_string()),
            NominatimError::ApiError { status, body } => GeocodeError::Service { status, body },
        }
    }
}

impl NominatimApi {
    /// Create a client for a Nominatim instance.
    ///
    /// * `base_url` - e.g. `https://nominatim.openstreetmap.org`.
    /// * `user_agent` - identifies the application; the public instance
    ///   rejects requests without one.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, NominatimError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a free-text query. Returns at most one place.
    ///
    /// Sends `GET /search?q=..&format=json&limit=1&addressdetails=1`.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchPlace>, NominatimError> {
        let response = self.search_request(query).send().await?;
        Self::parse_response(response).await
    }

    /// Find the place enclosing a point at the given zoom.
    ///
    /// Sends `GET /reverse?lat=..&lon=..&format=json&zoom=..&addressdetails=1`.
    pub async fn reverse_lookup(
        &self,
        coordinate: Coordinate,
        zoom: u8,
    ) -> Result<ReversePlace, NominatimError> {
        let response = self.reverse_request(coordinate, zoom).send().await?;
        Self::parse_response(response).await
    }

    fn search_request(&self, query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
    }

    fn reverse_request(&self, coordinate: Coordinate, zoom: u8) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lon.to_string()),
                ("format", "json".to_string()),
                ("zoom", zoom.to_string()),
                ("addressdetails", "1".to_string()),
            ])
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`NominatimError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, NominatimError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(NominatimError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, NominatimError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Geocoder for NominatimApi {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        let places = self.search(query).await?;
        tracing::debug!(query, results = places.len(), "Nominatim search answered");
        places.into_iter().next().map(SearchPlace::into_hit).transpose()
    }

    async fn reverse(
        &self,
        coordinate: Coordinate,
        zoom: u8,
    ) -> Result<Option<ReverseHit>, GeocodeError> {
        let place = self.reverse_lookup(coordinate, zoom).await?;
        if let Some(reason) = place.error.as_deref() {
            tracing::debug!(
                lat = coordinate.lat,
                lon = coordinate.lon,
                reason,
                "Nominatim reverse found nothing",
            );
        }
        Ok(place.into_hit())
    }
}
