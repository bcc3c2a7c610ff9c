//! Client for a spaCy-style NER server.
//!
//! Sends `POST {base}/ner` with `{"text": "..."}` and expects
//! `{"ents": [{"text": "...", "label": "GPE"}, ...]}`. Every failure is an
//! [`ExtractionError`]; the pipeline treats those as fatal.

use std::time::Duration;

use async_trait::async_trait;
use placefinder_core::capability::EntityRecognizer;
use placefinder_core::error::ExtractionError;
use placefinder_core::types::Entity;
use serde::Deserialize;

use crate::NerError;

/// HTTP request timeout for a single text block.
pub const DEFAULT_NER_TIMEOUT: Duration = Duration::from_secs(30);

/// Response body of the `/ner` endpoint.
#[derive(Debug, Deserialize)]
pub struct NerResponse {
    #[serde(alias = "entities", default)]
    pub ents: Vec<Entity>,
}

pub struct HttpEntityRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/ner", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> Result<NerResponse, NerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(NerError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<NerResponse>().await?)
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        match self.request(text).await {
            Ok(body) => Ok(body.ents),
            Err(NerError::Request(e)) if e.is_connect() || e.is_timeout() => {
                Err(ExtractionError::Unavailable(format!("{}: {e}", self.endpoint)))
            }
            Err(e) => Err(ExtractionError::Failed(e.to_string())),
        }
    }
}
