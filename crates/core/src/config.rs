//! Resolution policy: which names are too generic, which granularities
//! count as a direct hit, and how queries are built.
//!
//! The defaults reproduce the production policy for the Sonora/Arizona
//! border project set. Tests inject smaller fixtures through the `with_*`
//! builders.

use std::collections::HashSet;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Country/region names too coarse to locate a project.
pub const DEFAULT_GENERIC_PLACES: &[&str] = &[
    "Arizona",
    "Mexico",
    "United States",
    "USA",
    "Sonora",
    "U.S.",
    "America",
];

/// Geocoder `type` tags accepted as a direct hit.
pub const DEFAULT_ACCEPTED_TYPES: &[&str] = &[
    "city",
    "town",
    "village",
    "hamlet",
    "municipality",
    "locality",
    "county",
];

/// Address fields consulted, in order, when naming a reverse hit.
pub const DEFAULT_ADDRESS_PREFERENCE: &[&str] = &[
    "city",
    "town",
    "village",
    "hamlet",
    "county",
    "state_district",
    "state",
];

/// Qualifier appended to every forward query.
pub const DEFAULT_REGION_HINT: &str = "Mexico";

/// Nominatim zoom level for city/town granularity.
pub const DEFAULT_REVERSE_ZOOM: u8 = 10;

/// Highest zoom Nominatim understands.
pub const MAX_REVERSE_ZOOM: u8 = 18;

pub const MIN_PLACE_LEN: usize = 2;
pub const MAX_PLACE_LEN: usize = 40;

// ---------------------------------------------------------------------------
// ResolverConfig
// ---------------------------------------------------------------------------

/// Policy knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Exact (case-sensitive) names dropped by the place filter.
    pub generic_places: HashSet<String>,
    /// Inclusive character-length bounds for a candidate.
    pub min_place_len: usize,
    pub max_place_len: usize,
    /// Granularity tags accepted from forward geocoding.
    pub accepted_types: HashSet<String>,
    /// Appended to each forward query after a space. Empty disables it.
    pub region_hint: String,
    pub reverse_zoom: u8,
    pub address_preference: Vec<String>,
    /// Drop repeated candidates, keeping first occurrence order.
    pub dedupe_candidates: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            generic_places: to_set(DEFAULT_GENERIC_PLACES),
            min_place_len: MIN_PLACE_LEN,
            max_place_len: MAX_PLACE_LEN,
            accepted_types: to_set(DEFAULT_ACCEPTED_TYPES),
            region_hint: DEFAULT_REGION_HINT.to_string(),
            reverse_zoom: DEFAULT_REVERSE_ZOOM,
            address_preference: DEFAULT_ADDRESS_PREFERENCE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dedupe_candidates: true,
        }
    }
}

impl ResolverConfig {
    pub fn with_generic_places<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_places = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_accepted_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_region_hint(mut self, hint: impl Into<String>) -> Self {
        self.region_hint = hint.into();
        self
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe_candidates = dedupe;
        self
    }

    /// Whether a forward hit of this granularity is good enough.
    pub fn accepts_type(&self, place_type: &str) -> bool {
        self.accepted_types.contains(place_type)
    }

    /// Build the forward query for a candidate.
    pub fn forward_query(&self, candidate: &str) -> String {
        let hint = self.region_hint.trim();
        if hint.is_empty() {
            candidate.to_string()
        } else {
            format!("{candidate} {hint}")
        }
    }

    /// Reject configurations that would make every candidate or hit fail.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_place_len > self.max_place_len {
            return Err(CoreError::Validation(format!(
                "min_place_len ({}) exceeds max_place_len ({})",
                self.min_place_len, self.max_place_len
            )));
        }
        if self.accepted_types.is_empty() {
            return Err(CoreError::Validation(
                "accepted_types must not be empty".into(),
            ));
        }
        if self.reverse_zoom > MAX_REVERSE_ZOOM {
            return Err(CoreError::Validation(format!(
                "reverse_zoom must be between 0 and {MAX_REVERSE_ZOOM}, got {}",
                self.reverse_zoom
            )));
        }
        Ok(())
    }
}

fn to_set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
