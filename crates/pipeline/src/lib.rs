//! Place-resolution pipeline.
//!
//! Drives each record through extraction, direct geocoding and reverse
//! fallback, paced by a [`rate_limit::RateLimiter`], and reads/writes the
//! JSON record store.

pub mod direct;
pub mod error;
pub mod orchestrator;
pub mod rate_limit;
pub mod reverse;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::PipelineError;
pub use orchestrator::{ResolutionOrchestrator, RunReport, RunSummary};
pub use rate_limit::{IntervalLimiter, RateLimiter};
