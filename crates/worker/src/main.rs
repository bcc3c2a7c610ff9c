//! `placefinder-worker` -- batch place resolution.
//!
//! Reads a JSON array of records, resolves each to a location through
//! entity extraction, forward geocoding and reverse fallback, and writes
//! one result per record. See [`config::WorkerConfig::from_env`] for the
//! environment variables.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use placefinder_core::capability::EntityRecognizer;
use placefinder_core::error::ExtractionError;
use placefinder_geocoder::NominatimApi;
use placefinder_ner::{GazetteerRecognizer, HttpEntityRecognizer};
use placefinder_ner::http::DEFAULT_NER_TIMEOUT;
use placefinder_pipeline::store::{load_records, save_results};
use placefinder_pipeline::{IntervalLimiter, ResolutionOrchestrator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Cli, LogFormat, RecognizerSource, WorkerConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env(cli);
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or(LogFormat::Text),
    );

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(anyhow::Error::new(e).context("Invalid configuration")),
    };

    if let Err(e) = result {
        tracing::error!("Place resolution failed: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placefinder_worker=info,placefinder_pipeline=info".into()),
        )
        .with(text)
        .with(json)
        .init();
}

async fn run(config: WorkerConfig) -> anyhow::Result<()> {
    tracing::info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        nominatim = %config.nominatim_url,
        interval_ms = config.rate_limit_interval.as_millis() as u64,
        "Starting placefinder-worker",
    );

    let recognizer = build_recognizer(&config.recognizer).await?;

    let geocoder = NominatimApi::new(
        &config.nominatim_url,
        &config.user_agent,
        config.request_timeout,
    )
    .context("Failed to build geocoding client")?;

    let orchestrator = ResolutionOrchestrator::new(
        recognizer,
        Arc::new(geocoder),
        Arc::new(IntervalLimiter::new(config.rate_limit_interval)),
        config.resolver_config(),
    )
    .context("Invalid resolution policy")?;

    let records = load_records(&config.input_path).await?;
    let report = orchestrator.run(&records).await?;
    save_results(&config.output_path, &report.results).await?;

    let summary = report.summary;
    tracing::info!(
        total = summary.total,
        direct = summary.direct,
        reverse = summary.reverse,
        manual = summary.manual,
        geocode_requests = summary.geocode_requests,
        "Run summary",
    );
    tracing::info!("Done! Results written to {}", config.output_path.display());

    Ok(())
}

async fn build_recognizer(source: &RecognizerSource) -> anyhow::Result<Arc<dyn EntityRecognizer>> {
    match source {
        RecognizerSource::Http(url) => {
            let recognizer = HttpEntityRecognizer::new(url, DEFAULT_NER_TIMEOUT)
                .context("Failed to build NER client")?;
            tracing::info!(endpoint = recognizer.endpoint(), "Using NER server");
            Ok(Arc::new(recognizer))
        }
        RecognizerSource::Gazetteer(path) => {
            let recognizer = GazetteerRecognizer::from_file(path)
                .await
                .with_context(|| format!("Failed to load gazetteer {}", path.display()))?;
            Ok(Arc::new(recognizer))
        }
        RecognizerSource::Unconfigured => Err(ExtractionError::Unavailable(
            "set NER_URL or GAZETTEER_PATH".into(),
        )
        .into()),
    }
}
