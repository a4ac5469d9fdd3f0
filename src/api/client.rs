//! HTTP client for the query backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::{ApiError, Result};
use crate::api::types::{ErrorBody, ImportResponse, QueryRequest, QueryResult, SetupResponse};
use crate::config::BackendConfig;

/// Path of the sample-database seeding endpoint.
pub const SETUP_PATH: &str = "api/setup";
/// Path of the CSV bulk-import endpoint.
pub const IMPORT_CSV_PATH: &str = "api/import-csv";
/// Path of the natural-language query endpoint.
pub const QUERY_PATH: &str = "api/query";

/// The three backend operations the widget depends on.
///
/// Implemented over HTTP by [`HttpBackend`]; tests substitute their own.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// `POST /api/setup`: seed the sample database.
    async fn setup(&self) -> Result<SetupResponse>;

    /// `POST /api/import-csv`: import every CSV file the backend can see.
    async fn import_csv(&self) -> Result<ImportResponse>;

    /// `POST /api/query`: translate and run a natural-language question.
    async fn query(&self, question: &str) -> Result<QueryResult>;
}

/// [`Backend`] implementation talking JSON over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use nlq_chat::api::{Backend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:5000")?;
/// let answer = backend.query("How many products are in stock?").await?;
/// println!("{}", answer.result);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Endpoint paths are joined relative to the base, keep any prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Build a client from configuration, applying the optional timeout.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_client(&config.base_url, builder.build()?)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Decode a response, enforcing the JSON content type and treating
    /// either a non-ok status or an `error` field as failure.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));

        if !is_json {
            let text = response.text().await?;
            return Err(ApiError::protocol_mismatch(status.as_u16(), &text));
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        // Only an object carries the envelope; derived structs would also
        // accept a bare array positionally.
        let envelope = if body.is_object() {
            ErrorBody::deserialize(&body).unwrap_or_default()
        } else {
            ErrorBody::default()
        };

        if let Some(diag) = &envelope.debug {
            tracing::debug!(status = status.as_u16(), debug = %diag, "Backend diagnostic payload");
        }

        let detail = envelope.detail();
        if !status.is_success() || detail.is_some() {
            return Err(ApiError::Application {
                status: status.as_u16(),
                message: detail.unwrap_or_else(|| fallback.to_string()),
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn setup(&self) -> Result<SetupResponse> {
        let response = self.http.post(self.url(SETUP_PATH)?).send().await?;
        Self::read_json(response, "Setup failed").await
    }

    async fn import_csv(&self) -> Result<ImportResponse> {
        let response = self.http.post(self.url(IMPORT_CSV_PATH)?).send().await?;
        Self::read_json(response, "CSV import failed").await
    }

    async fn query(&self, question: &str) -> Result<QueryResult> {
        let req = QueryRequest {
            question: question.to_string(),
        };
        let response = self
            .http
            .post(self.url(QUERY_PATH)?)
            .json(&req)
            .send()
            .await?;
        let result: QueryResult = Self::read_json(response, "Query failed").await?;
        if let Some(echo) = &result.question {
            tracing::debug!(question = %echo, "Backend echoed question");
        }
        Ok(result)
    }
}
