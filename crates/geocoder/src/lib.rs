//! Nominatim geocoding client.
//!
//! Provides typed response parsing and an HTTP API wrapper that implements
//! the [`placefinder_core::capability::Geocoder`] capability.

pub mod api;
pub mod messages;

pub use api::{NominatimApi, NominatimError};
