//! Shared fakes for pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use placefinder_core::capability::{EntityRecognizer, Geocoder};
use placefinder_core::config::ResolverConfig;
use placefinder_core::error::{ExtractionError, GeocodeError};
use placefinder_core::types::{Coordinate, Entity, GeocodeHit, ReverseHit, GPE_LABEL};
use placefinder_pipeline::{RateLimiter, ResolutionOrchestrator};

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

/// Recognizes a fixed vocabulary of place names, in text order.
pub struct VocabularyRecognizer {
    places: Vec<String>,
}

impl VocabularyRecognizer {
    pub fn new(places: &[&str]) -> Self {
        Self {
            places: places.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl EntityRecognizer for VocabularyRecognizer {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        let mut found: Vec<(usize, &str)> = self
            .places
            .iter()
            .flat_map(|place| {
                text.match_indices(place.as_str())
                    .map(|(index, _)| (index, place.as_str()))
            })
            .collect();
        found.sort();
        Ok(found
            .into_iter()
            .map(|(_, place)| Entity::new(place, GPE_LABEL))
            .collect())
    }
}

/// A model that is not available.
pub struct MissingModel;

#[async_trait]
impl EntityRecognizer for MissingModel {
    async fn extract_entities(&self, _text: &str) -> Result<Vec<Entity>, ExtractionError> {
        Err(ExtractionError::Unavailable("en_core_web_sm not installed".into()))
    }
}

// ---------------------------------------------------------------------------
// Geocoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Forward(String),
    Reverse(Coordinate, u8),
}

/// Table-driven geocoder that records every call.
#[derive(Default)]
pub struct TableGeocoder {
    forward: HashMap<String, Result<GeocodeHit, String>>,
    reverse: HashMap<String, Result<ReverseHit, String>>,
    calls: Mutex<Vec<Call>>,
}

fn coordinate_key(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.lat, coordinate.lon)
}

impl TableGeocoder {
    pub fn hit(mut self, query: &str, display_name: &str, place_type: &str, at: Coordinate) -> Self {
        self.forward.insert(
            query.to_string(),
            Ok(GeocodeHit {
                coordinate: at,
                display_name: display_name.to_string(),
                place_type: place_type.to_string(),
            }),
        );
        self
    }

    pub fn forward_error(mut self, query: &str) -> Self {
        self.forward
            .insert(query.to_string(), Err("connection reset".to_string()));
        self
    }

    pub fn reverse_address(mut self, at: Coordinate, address: &[(&str, &str)]) -> Self {
        self.reverse.insert(
            coordinate_key(at),
            Ok(ReverseHit {
                address: address
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                display_name: None,
            }),
        );
        self
    }

    pub fn reverse_error(mut self, at: Coordinate) -> Self {
        self.reverse
            .insert(coordinate_key(at), Err("timed out".to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Forward(query.to_string()));
        match self.forward.get(query) {
            Some(Ok(hit)) => Ok(Some(hit.clone())),
            Some(Err(message)) => Err(GeocodeError::Request(message.clone())),
            None => Ok(None),
        }
    }

    async fn reverse(
        &self,
        coordinate: Coordinate,
        zoom: u8,
    ) -> Result<Option<ReverseHit>, GeocodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Reverse(coordinate, zoom));
        match self.reverse.get(&coordinate_key(coordinate)) {
            Some(Ok(hit)) => Ok(Some(hit.clone())),
            Some(Err(message)) => Err(GeocodeError::Request(message.clone())),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Limiter
// ---------------------------------------------------------------------------

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

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub orchestrator: ResolutionOrchestrator,
    pub geocoder: Arc<TableGeocoder>,
    pub limiter: Arc<CountingLimiter>,
}

pub fn harness(
    recognizer: impl EntityRecognizer + 'static,
    geocoder: TableGeocoder,
    config: ResolverConfig,
) -> Harness {
    let geocoder = Arc::new(geocoder);
    let limiter = Arc::new(CountingLimiter::default());
    let orchestrator = ResolutionOrchestrator::new(
        Arc::new(recognizer),
        geocoder.clone(),
        limiter.clone(),
        config,
    )
    .expect("valid test config");

    Harness {
        orchestrator,
        geocoder,
        limiter,
    }
}
