use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use placefinder_core::config::{ResolverConfig, DEFAULT_REGION_HINT};
use placefinder_geocoder::api::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use placefinder_pipeline::rate_limit::DEFAULT_INTERVAL;

pub const DEFAULT_INPUT_PATH: &str = "storymapdata_db_ready.json";
pub const DEFAULT_OUTPUT_PATH: &str = "storymap-locations-preview.json";

/// Command-line arguments. Each path, when given, overrides its variable.
#[derive(Debug, Default, Parser)]
#[command(name = "placefinder-worker")]
#[command(version, about = "Resolve project records to locations")]
pub struct Cli {
    /// Record store to read (overrides `INPUT_PATH`).
    pub input: Option<PathBuf>,
    /// Result file to write (overrides `OUTPUT_PATH`).
    pub output: Option<PathBuf>,
}

/// Errors raised while reading worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where entity recognition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerSource {
    /// NER model server base URL.
    Http(String),
    /// Newline-separated list of known place names.
    Gazetteer(PathBuf),
    /// Nothing configured; the run fails at the first extraction.
    Unconfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub nominatim_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub rate_limit_interval: Duration,
    pub recognizer: RecognizerSource,
    pub region_hint: String,
    /// Overrides the built-in denylist when set.
    pub generic_places: Option<HashSet<String>>,
    pub dedupe_candidates: bool,
    pub log_format: LogFormat,
}

impl WorkerConfig {
    /// Load configuration from the process environment and command line.
    ///
    /// | Env Var                  | Default                               |
    /// |--------------------------|---------------------------------------|
    /// | `INPUT_PATH`             | `storymapdata_db_ready.json`          |
    /// | `OUTPUT_PATH`            | `storymap-locations-preview.json`     |
    /// | `NOMINATIM_URL`          | `https://nominatim.openstreetmap.org` |
    /// | `NOMINATIM_USER_AGENT`   | `placefinder/<version>`               |
    /// | `REQUEST_TIMEOUT_SECS`   | `10`                                  |
    /// | `RATE_LIMIT_INTERVAL_MS` | `1000`                                |
    /// | `NER_URL`                | unset                                 |
    /// | `GAZETTEER_PATH`         | unset                                 |
    /// | `REGION_HINT`            | `Mexico`                              |
    /// | `GENERIC_PLACES`         | unset (comma-separated)               |
    /// | `DEDUPE_CANDIDATES`      | `true`                                |
    /// | `LOG_FORMAT`             | `text`                                |
    ///
    /// Positional arguments `[input] [output]` take precedence over the
    /// two path variables.
    pub fn from_env(cli: Cli) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), cli)
    }

    /// Build from an arbitrary variable lookup and parsed arguments.
    pub fn from_lookup<F>(lookup: F, cli: Cli) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let input_path = cli
            .input
            .or_else(|| var("INPUT_PATH").map(PathBuf::from))
            .unwrap_or_else(|| DEFAULT_INPUT_PATH.into());
        let output_path = cli
            .output
            .or_else(|| var("OUTPUT_PATH").map(PathBuf::from))
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.into());

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_u64("REQUEST_TIMEOUT_SECS", &v)?),
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        let rate_limit_interval = match var("RATE_LIMIT_INTERVAL_MS") {
            Some(v) => Duration::from_millis(parse_u64("RATE_LIMIT_INTERVAL_MS", &v)?),
            None => DEFAULT_INTERVAL,
        };

        let recognizer = match (var("NER_URL"), var("GAZETTEER_PATH")) {
            (Some(url), _) => RecognizerSource::Http(url),
            (None, Some(path)) => RecognizerSource::Gazetteer(path.into()),
            (None, None) => RecognizerSource::Unconfigured,
        };

        let dedupe_candidates = match var("DEDUPE_CANDIDATES") {
            Some(v) => parse_bool("DEDUPE_CANDIDATES", &v)?,
            None => true,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => parse_log_format(&v)?,
            None => LogFormat::Text,
        };

        Ok(Self {
            input_path,
            output_path,
            nominatim_url: var("NOMINATIM_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            user_agent: var("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|| format!("placefinder/{}", env!("CARGO_PKG_VERSION"))),
            request_timeout,
            rate_limit_interval,
            recognizer,
            // An explicitly empty hint disables it, so read the raw value.
            region_hint: lookup("REGION_HINT").unwrap_or_else(|| DEFAULT_REGION_HINT.into()),
            generic_places: var("GENERIC_PLACES").map(|v| parse_list(&v)),
            dedupe_candidates,
            log_format,
        })
    }

    /// Resolution policy derived from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default()
            .with_region_hint(self.region_hint.clone())
            .with_dedupe(self.dedupe_candidates);
        if let Some(names) = &self.generic_places {
            config = config.with_generic_places(names.iter().cloned());
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected: "a non-negative integer",
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::Invalid {
            name: "LOG_FORMAT",
            expected: "`text` or `json`",
            value: value.to_string(),
        }),
    }
}

fn parse_list(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
