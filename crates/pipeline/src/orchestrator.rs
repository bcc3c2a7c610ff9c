//! Per-record resolution state machine.
//!
//! ```text
//! START -> EXTRACTING -> DIRECT_ATTEMPT -> REVERSE_ATTEMPT -> MANUAL -> DONE
//!                              |                 |
//!                              +------> DONE <---+
//! ```
//!
//! Records are resolved strictly one after another, in input order. The
//! geocoding service enforces a global request rate, so there is no
//! cross-record concurrency; the only suspension points are the rate-limit
//! pauses taken by the resolvers.

use std::sync::Arc;

use placefinder_core::capability::{EntityRecognizer, Geocoder};
use placefinder_core::config::ResolverConfig;
use placefinder_core::filter::filter_places;
use placefinder_core::places::{dedupe_preserving_order, extract_places};
use placefinder_core::text::aggregate_texts;
use placefinder_core::types::{Record, ResolutionMethod, ResolutionResult};
use serde::Serialize;

use crate::direct::GeocodeResolver;
use crate::error::PipelineError;
use crate::rate_limit::RateLimiter;
use crate::reverse::ReverseResolver;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

enum Stage<'r> {
    Start,
    Extracting { texts: Vec<&'r str> },
    DirectAttempt { candidates: Vec<String> },
    ReverseAttempt { candidates: Vec<String> },
    Manual { candidates: Vec<String> },
    Done(ResolutionResult),
}

impl Stage<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Extracting { .. } => "extracting",
            Self::DirectAttempt { .. } => "direct_attempt",
            Self::ReverseAttempt { .. } => "reverse_attempt",
            Self::Manual { .. } => "manual",
            Self::Done(_) => "done",
        }
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Counts for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub direct: usize,
    pub reverse: usize,
    pub manual: usize,
    /// Forward plus reverse requests issued.
    pub geocode_requests: usize,
}

impl RunSummary {
    fn record(&mut self, method: ResolutionMethod) {
        self.total += 1;
        match method {
            ResolutionMethod::Direct => self.direct += 1,
            ResolutionMethod::Reverse => self.reverse += 1,
            ResolutionMethod::Manual => self.manual += 1,
        }
    }
}

/// Results of a run, one per input record and in input order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub results: Vec<ResolutionResult>,
    pub summary: RunSummary,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct ResolutionOrchestrator {
    recognizer: Arc<dyn EntityRecognizer>,
    geocoder: Arc<dyn Geocoder>,
    limiter: Arc<dyn RateLimiter>,
    config: ResolverConfig,
}

impl ResolutionOrchestrator {
    /// Rejects a configuration that could never accept a hit.
    pub fn new(
        recognizer: Arc<dyn EntityRecognizer>,
        geocoder: Arc<dyn Geocoder>,
        limiter: Arc<dyn RateLimiter>,
        config: ResolverConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            recognizer,
            geocoder,
            limiter,
            config,
        })
    }

    /// Resolve every record in order.
    ///
    /// Only extraction failures abort the run; geocoding trouble on one
    /// record shows up as a `manual` result.
    pub async fn run(&self, records: &[Record]) -> Result<RunReport, PipelineError> {
        let mut report = RunReport {
            results: Vec::with_capacity(records.len()),
            summary: RunSummary::default(),
        };

        for record in records {
            let (result, requests) = self.resolve_with_stats(record).await?;

            tracing::info!(
                method = %result.method,
                "{}: {} ({})",
                record.display_name(),
                result.location.as_deref().unwrap_or("None"),
                result.method,
            );

            report.summary.record(result.method);
            report.summary.geocode_requests += requests;
            report.results.push(result);
        }

        Ok(report)
    }

    /// Resolve a single record through the fallback chain.
    pub async fn resolve_record(&self, record: &Record) -> Result<ResolutionResult, PipelineError> {
        self.resolve_with_stats(record)
            .await
            .map(|(result, _)| result)
    }

    async fn resolve_with_stats(
        &self,
        record: &Record,
    ) -> Result<(ResolutionResult, usize), PipelineError> {
        let name = record.display_name();
        let mut requests = 0;
        let mut stage = Stage::Start;

        loop {
            tracing::trace!(record = name, stage = stage.label(), "Resolution stage");

            stage = match stage {
                Stage::Start => Stage::Extracting {
                    texts: aggregate_texts(record),
                },

                Stage::Extracting { texts } => {
                    let raw = extract_places(self.recognizer.as_ref(), &texts).await?;
                    let mut candidates = filter_places(raw, &self.config);
                    if self.config.dedupe_candidates {
                        candidates = dedupe_preserving_order(candidates);
                    }
                    Stage::DirectAttempt { candidates }
                }

                Stage::DirectAttempt { candidates } => {
                    let resolver = GeocodeResolver::new(
                        self.geocoder.as_ref(),
                        self.limiter.as_ref(),
                        &self.config,
                    );
                    let outcome = resolver.resolve(name, &candidates).await;
                    requests += outcome.attempts;

                    match outcome.hit {
                        Some(hit) => Stage::Done(ResolutionResult::direct(
                            record.name.clone(),
                            candidates,
                            hit,
                        )),
                        None => Stage::ReverseAttempt { candidates },
                    }
                }

                Stage::ReverseAttempt { candidates } => {
                    let coordinate = record.coordinate();
                    if coordinate.is_some() {
                        requests += 1;
                    }
                    let resolver = ReverseResolver::new(
                        self.geocoder.as_ref(),
                        self.limiter.as_ref(),
                        &self.config,
                    );

                    match resolver.resolve(name, coordinate).await {
                        Ok((location, coordinate)) => Stage::Done(ResolutionResult::reverse(
                            record.name.clone(),
                            candidates,
                            location,
                            coordinate,
                        )),
                        Err(reason) => {
                            tracing::debug!(
                                record = name,
                                reason = %reason,
                                "Reverse fallback produced nothing",
                            );
                            Stage::Manual { candidates }
                        }
                    }
                }

                Stage::Manual { candidates } => {
                    Stage::Done(ResolutionResult::manual(record.name.clone(), candidates))
                }

                Stage::Done(result) => return Ok((result, requests)),
            };
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
