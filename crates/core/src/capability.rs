//! External capabilities consumed by the pipeline.
//!
//! Entity recognition and geocoding live behind these traits so the
//! resolution policy can be exercised with in-memory fakes.

use async_trait::async_trait;

use crate::error::{ExtractionError, GeocodeError};
use crate::types::{Coordinate, Entity, GeocodeHit, ReverseHit};

/// Named-entity recognition over a single block of text.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Entities in text order. Any error is fatal to the run.
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError>;
}

/// Forward and reverse geocoding.
///
/// `Ok(None)` means the service answered but found nothing. Errors are
/// expected and are downgraded to "no hit" by the resolvers.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError>;

    async fn reverse(
        &self,
        coordinate: Coordinate,
        zoom: u8,
    ) -> Result<Option<ReverseHit>, GeocodeError>;
}
