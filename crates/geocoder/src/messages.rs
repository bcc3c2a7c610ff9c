//! Nominatim JSON response types.
//!
//! `/search?format=json` returns an array of places; `/reverse?format=json`
//! returns a single place with an `address` breakdown, or an object with an
//! `error` field when nothing encloses the point. Nominatim encodes `lat`
//! and `lon` as strings, but some compatible servers emit numbers, so both
//! are accepted.

use std::collections::HashMap;

use placefinder_core::error::GeocodeError;
use placefinder_core::types::{Coordinate, GeocodeHit, ReverseHit};
use serde::Deserialize;

/// A latitude or longitude as sent on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireDegrees {
    Number(f64),
    Text(String),
}

impl WireDegrees {
    fn to_f64(&self, field: &str) -> Result<f64, GeocodeError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::Decode(format!("{field} is not a number: '{s}'")))?,
        };
        if !value.is_finite() {
            return Err(GeocodeError::Decode(format!("{field} is not finite")));
        }
        Ok(value)
    }
}

/// One entry of a `/search` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPlace {
    pub lat: WireDegrees,
    pub lon: WireDegrees,
    #[serde(default)]
    pub display_name: String,
    /// Granularity tag (`city`, `village`, `administrative`, ...).
    #[serde(rename = "type", default)]
    pub place_type: String,
}

impl SearchPlace {
    pub fn into_hit(self) -> Result<GeocodeHit, GeocodeError> {
        Ok(GeocodeHit {
            coordinate: Coordinate::new(self.lat.to_f64("lat")?, self.lon.to_f64("lon")?),
            display_name: self.display_name,
            place_type: self.place_type,
        })
    }
}

/// Body of a `/reverse` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReversePlace {
    #[serde(default)]
    pub display_name: Option<String>,
    /// Address components. Non-string values are ignored.
    #[serde(default)]
    pub address: HashMap<String, serde_json::Value>,
    /// Present when Nominatim could not geocode the point.
    #[serde(default)]
    pub error: Option<String>,
}

impl ReversePlace {
    /// `None` when the service reported that nothing was found.
    pub fn into_hit(self) -> Option<ReverseHit> {
        if self.error.is_some() {
            return None;
        }
        let address: HashMap<String, String> = self
            .address
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        if address.is_empty() && self.display_name.is_none() {
            return None;
        }
        Some(ReverseHit {
            address,
            display_name: self.display_name,
        })
    }
}
