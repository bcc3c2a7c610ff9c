//! Domain types for records, geocoding hits and resolution results.
//!
//! Field names on the wire are PascalCase to match the project record
//! store. Every input field is optional; readers ignore unknown fields so
//! that a result file can be fed back in as input.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Entity label used by the recognizer for geopolitical places.
pub const GPE_LABEL: &str = "GPE";

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// Outcome block attached to a project record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Outcome {
    #[serde(default)]
    pub summary: Option<String>,
}

/// A single artwork attached to a project record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Artwork {
    #[serde(default)]
    pub description: Option<String>,
}

/// A project record as read from the record store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description_long: Option<String>,
    #[serde(default)]
    pub description_short: Option<String>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artworks: Vec<Artwork>,
    #[serde(default, deserialize_with = "lenient_degrees")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_degrees")]
    pub longitude: Option<f64>,
}

impl Record {
    /// The record's pre-existing coordinate, if it has a usable one.
    ///
    /// Both components must be present, finite and non-zero. The upstream
    /// converter writes `0` for "unknown", so a zero component counts as
    /// missing.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if usable_degree(lat) && usable_degree(lon) => {
                Some(Coordinate::new(lat, lon))
            }
            _ => None,
        }
    }

    /// Display label for progress logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

fn usable_degree(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Accept a JSON number, a numeric string, an empty string or null.
fn lenient_degrees<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Option::<Degrees>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Degrees::Number(n)) => Ok(Some(n)),
        Some(Degrees::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid coordinate '{s}'")))
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Capability payloads
// ---------------------------------------------------------------------------

/// A named entity returned by the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    pub fn is_place(&self) -> bool {
        self.label == GPE_LABEL
    }
}

/// Result of a forward (name to coordinate) geocode.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub coordinate: Coordinate,
    /// Canonical name as reported by the service.
    pub display_name: String,
    /// Granularity tag, e.g. `city`, `village`, `county`.
    pub place_type: String,
}

/// Result of a reverse (coordinate to name) geocode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseHit {
    /// Address breakdown keyed by field (`city`, `town`, `state`, ...).
    pub address: HashMap<String, String>,
    pub display_name: Option<String>,
}

impl ReverseHit {
    /// Pick the first non-empty address field from `preference`, falling
    /// back to the display name.
    pub fn best_name<S: AsRef<str>>(&self, preference: &[S]) -> Option<String> {
        preference
            .iter()
            .filter_map(|key| self.address.get(key.as_ref()))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.display_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
    }
}

// ---------------------------------------------------------------------------
// Resolution result
// ---------------------------------------------------------------------------

/// How a record's location was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// A candidate place name geocoded to an accepted granularity.
    Direct,
    /// The record's own coordinate was reverse-geocoded.
    Reverse,
    /// Nothing usable; needs human curation.
    Manual,
}

impl ResolutionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Reverse => "reverse",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row per input record.
///
/// Construct through [`ResolutionResult::direct`], [`ResolutionResult::reverse`]
/// or [`ResolutionResult::manual`] so the location/coordinate pairing always
/// matches the method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "SpecificPlacesFound")]
    pub candidates: Vec<String>,
    #[serde(rename = "ChosenLocation")]
    pub location: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "GeocodeType")]
    pub method: ResolutionMethod,
}

impl ResolutionResult {
    pub fn direct(name: Option<String>, candidates: Vec<String>, hit: GeocodeHit) -> Self {
        Self {
            name,
            candidates,
            location: Some(hit.display_name),
            latitude: Some(hit.coordinate.lat),
            longitude: Some(hit.coordinate.lon),
            method: ResolutionMethod::Direct,
        }
    }

    pub fn reverse(
        name: Option<String>,
        candidates: Vec<String>,
        location: String,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            name,
            candidates,
            location: Some(location),
            latitude: Some(coordinate.lat),
            longitude: Some(coordinate.lon),
            method: ResolutionMethod::Reverse,
        }
    }

    pub fn manual(name: Option<String>, candidates: Vec<String>) -> Self {
        Self {
            name,
            candidates,
            location: None,
            latitude: None,
            longitude: None,
            method: ResolutionMethod::Manual,
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
