//! Domain logic for the place-resolution pipeline.
//!
//! Pure types and policy: record parsing, text aggregation, place
//! extraction and filtering, and the capability traits for entity
//! recognition and geocoding. No network or file I/O lives here.

pub mod capability;
pub mod config;
pub mod error;
pub mod filter;
pub mod places;
pub mod text;
pub mod types;
