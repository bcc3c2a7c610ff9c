//! JSON record store: an array of records in, an array of results out.

use std::path::Path;

use placefinder_core::types::{Record, ResolutionResult};

use crate::error::PipelineError;

/// Read all records from a JSON array file.
pub async fn load_records(path: &Path) -> Result<Vec<Record>, PipelineError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PipelineError::ReadStore {
            path: path.display().to_string(),
            source,
        })?;

    let records: Vec<Record> =
        serde_json::from_slice(&bytes).map_err(|source| PipelineError::ParseStore {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!(path = %path.display(), records = records.len(), "Records loaded");
    Ok(records)
}

/// Write results as a pretty-printed JSON array.
///
/// Non-ASCII text is written as UTF-8, not escaped. Missing parent
/// directories are created.
pub async fn save_results(path: &Path, results: &[ResolutionResult]) -> Result<(), PipelineError> {
    let json = serde_json::to_vec_pretty(results)?;
    let write_err = |source| PipelineError::WriteStore {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, json).await.map_err(write_err)?;

    tracing::info!(path = %path.display(), results = results.len(), "Results written");
    Ok(())
}
