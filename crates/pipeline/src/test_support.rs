//! In-memory fakes for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use placefinder_core::capability::{EntityRecognizer, Geocoder};
use placefinder_core::error::{ExtractionError, GeocodeError};
use placefinder_core::types::{Coordinate, Entity, GeocodeHit, ReverseHit, GPE_LABEL};

use crate::rate_limit::RateLimiter;

/// Counts pauses instead of sleeping.
#[derive(Default)]
pub struct CountingLimiter {
    pauses: AtomicUsize,
}

impl CountingLimiter {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Answers forward queries from a table; unknown queries find nothing.
#[derive(Default)]
pub struct ScriptedGeocoder {
    pub forward: HashMap<String, Result<GeocodeHit, u16>>,
    pub reverse: Option<Result<ReverseHit, u16>>,
    pub forward_queries: Mutex<Vec<String>>,
    pub reverse_calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn with_hit(mut self, query: &str, name: &str, place_type: &str) -> Self {
        self.forward.insert(
            query.to_string(),
            Ok(GeocodeHit {
                coordinate: Coordinate::new(29.0, -110.0),
                display_name: name.to_string(),
                place_type: place_type.to_string(),
            }),
        );
        self
    }

    pub fn with_failure(mut self, query: &str, status: u16) -> Self {
        self.forward.insert(query.to_string(), Err(status));
        self
    }

    pub fn with_reverse(mut self, address: &[(&str, &str)]) -> Self {
        self.reverse = Some(Ok(ReverseHit {
            address: address
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            display_name: None,
        }));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.forward_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        self.forward_queries.lock().unwrap().push(query.to_string());
        match self.forward.get(query) {
            Some(Ok(hit)) => Ok(Some(hit.clone())),
            Some(Err(status)) => Err(GeocodeError::Service {
                status: *status,
                body: String::new(),
            }),
            None => Ok(None),
        }
    }

    async fn reverse(
        &self,
        _coordinate: Coordinate,
        _zoom: u8,
    ) -> Result<Option<ReverseHit>, GeocodeError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        match &self.reverse {
            Some(Ok(hit)) => Ok(Some(hit.clone())),
            Some(Err(status)) => Err(GeocodeError::Service {
                status: *status,
                body: String::new(),
            }),
            None => Ok(None),
        }
    }
}

/// Treats every capitalised word as a place.
pub struct CapitalizedRecognizer;

#[async_trait]
impl EntityRecognizer for CapitalizedRecognizer {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        Ok(text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
            .map(|word| Entity::new(word, GPE_LABEL))
            .collect())
    }
}
