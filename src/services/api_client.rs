//! REST API client for the AmalSAS backend.
//!
//! A thin wrapper over reqwest that:
//! - resolves endpoint paths against the configured API root
//! - attaches the session's bearer token to every request once set
//! - sends JSON or multipart bodies
//! - unwraps the backend's `{code, data}` envelope and surfaces `message` on errors
//! - applies per-operation timeouts, optional read retries and prometheus metrics

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use prometheus::{CounterVec, HistogramVec, Opts, Registry};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    RetryIf,
};
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::models::{ApiEnvelope, ApiErrorBody};
use crate::telemetry::redact_sensitive_data;

/// Configuration for the API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiClientConfig {
    /// Timeout for reads (GET), in seconds
    pub read_timeout_seconds: u64,

    /// Timeout for writes, including uploads, in seconds
    pub write_timeout_seconds: u64,

    /// Connection timeout, in seconds
    pub connect_timeout_seconds: u64,

    /// Retry configuration for idempotent reads
    pub retry: RetryConfig,

    /// Log every request/response pair
    pub enable_detailed_logging: bool,
}

/// Retry configuration. `max_attempts == 0` disables retries entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    pub max_attempts: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Retry on these HTTP status codes
    pub retry_on_status: Vec<u16>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_seconds: 10,
            write_timeout_seconds: 30,
            connect_timeout_seconds: 5,
            retry: RetryConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay_ms: 100,
            max_delay_ms: 2000,
            retry_on_status: vec![502, 503, 504],
        }
    }
}

/// Metrics for outgoing API requests
#[derive(Clone)]
pub struct ApiClientMetrics {
    /// Requests by destination, method, and outcome
    pub requests_total: CounterVec,

    /// Request duration by destination and method
    pub request_duration_seconds: HistogramVec,

    /// Timeouts by destination and operation type
    pub timeouts_total: CounterVec,
}

impl ApiClientMetrics {
    /// Create the collectors and register them on `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new("amalsas_api_requests_total", "Total API requests by destination, method, and outcome"),
            &["destination", "method", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "amalsas_api_request_duration_seconds",
                "Duration of API requests",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["destination", "method"],
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new("amalsas_api_timeouts_total", "Total timeouts by destination and type"),
            &["destination", "timeout_type"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            timeouts_total,
        })
    }
}

/// A file attached to a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: mime_for(file_name).to_string(),
            bytes,
        }
    }

    /// Read a file from disk into a part named `field`
    pub fn from_path(field: &str, path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(field, &file_name, bytes))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Multipart form description. Kept as plain data so it can be inspected
/// and cloned; converted to a reqwest form at send time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(file) = self.file {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Request payload encoding
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
struct RequestContext {
    destination: String,
    method: String,
    url: String,
    request_id: String,
}

/// Operation type for determining the timeout and retry eligibility
#[derive(Debug, Clone, Copy, PartialEq)]
enum OperationType {
    Read,
    Write,
}

/// HTTP client bound to one API root.
///
/// Clones share the bearer token, so setting it after sign-in is visible to
/// every service holding a clone.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    config: ApiClientConfig,
    metrics: Option<ApiClientMetrics>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        config: ApiClientConfig,
        metrics: Option<ApiClientMetrics>,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(std::cmp::max(
                config.read_timeout_seconds,
                config.write_timeout_seconds,
            )))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            config,
            metrics,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Attach (or with `None`, drop) the bearer token sent on every request
    pub fn set_auth_token(&self, token: Option<&str>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token.filter(|t| !t.is_empty()).map(str::to_string);
    }

    pub fn auth_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Resolve `path` (with or without a leading slash) under the API root
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, RequestBody::Empty).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, RequestBody::json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, RequestBody::json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, RequestBody::Empty).await
    }

    /// Send a request and decode the `data` member of the response envelope
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let text = self.execute(method, path, body).await?;
        serde_json::from_str::<ApiEnvelope<T>>(&text)
            .map(|envelope| envelope.data)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        let context = RequestContext {
            destination: url.host_str().unwrap_or("unknown").to_string(),
            method: method.to_string(),
            url: redact_sensitive_data(url.as_str()),
            request_id: Uuid::new_v4().to_string(),
        };

        let operation_type = if method == Method::GET {
            OperationType::Read
        } else {
            OperationType::Write
        };
        let timeout = match operation_type {
            OperationType::Read => Duration::from_secs(self.config.read_timeout_seconds),
            OperationType::Write => Duration::from_secs(self.config.write_timeout_seconds),
        };

        let started = Instant::now();
        let result = if operation_type == OperationType::Read && self.config.retry.max_attempts > 0 {
            let strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
                .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
                .map(jitter)
                .take(self.config.retry.max_attempts);
            let retry_on = &self.config.retry.retry_on_status;

            RetryIf::spawn(
                strategy,
                || self.attempt(&method, &url, &body, &context, timeout),
                |err: &ApiError| err.is_retryable(retry_on),
            )
            .await
        } else {
            self.attempt(&method, &url, &body, &context, timeout).await
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(ApiError::Status { .. }) => "http_error",
            Err(ApiError::Timeout) => "timeout",
            Err(ApiError::Network(_)) => "network_error",
            Err(_) => "error",
        };
        self.record_request_metrics(&context, outcome, started.elapsed());
        if matches!(result, Err(ApiError::Timeout)) {
            self.record_timeout(&context, operation_type);
        }

        result
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        body: &RequestBody,
        context: &RequestContext,
        timeout: Duration,
    ) -> Result<String, ApiError> {
        let start = Instant::now();

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header("X-Request-ID", context.request_id.as_str());
        if let Some(token) = self.auth_token() {
            request = request.bearer_auth(token);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Multipart(parts) => request.multipart(parts.clone().into_form()?),
        };

        match tokio::time::timeout(timeout, request.send()).await {
            Ok(Ok(response)) => {
                let status = response.status();
                let text = response.text().await?;
                let duration_ms = start.elapsed().as_millis();

                if status.is_success() {
                    if self.config.enable_detailed_logging {
                        info!(
                            destination = %context.destination,
                            method = %context.method,
                            url = %context.url,
                            request_id = %context.request_id,
                            status = status.as_u16(),
                            duration_ms,
                            "Request completed successfully"
                        );
                    }
                    Ok(text)
                } else {
                    let message = serde_json::from_str::<ApiErrorBody>(&text)
                        .ok()
                        .and_then(|body| body.message)
                        .filter(|m| !m.trim().is_empty());
                    if self.config.enable_detailed_logging {
                        warn!(
                            destination = %context.destination,
                            method = %context.method,
                            url = %context.url,
                            request_id = %context.request_id,
                            status = status.as_u16(),
                            message = ?message,
                            duration_ms,
                            "Request rejected by server"
                        );
                    }
                    Err(ApiError::Status {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
            Ok(Err(e)) => {
                if self.config.enable_detailed_logging {
                    error!(
                        destination = %context.destination,
                        method = %context.method,
                        url = %context.url,
                        request_id = %context.request_id,
                        error = %e,
                        duration_ms = start.elapsed().as_millis(),
                        "Request failed with network error"
                    );
                }
                Err(ApiError::Network(e))
            }
            Err(_) => {
                if self.config.enable_detailed_logging {
                    warn!(
                        destination = %context.destination,
                        method = %context.method,
                        url = %context.url,
                        request_id = %context.request_id,
                        timeout_seconds = timeout.as_secs(),
                        "Request timed out"
                    );
                }
                Err(ApiError::Timeout)
            }
        }
    }

    fn record_request_metrics(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .requests_total
                .with_label_values(&[context.destination.as_str(), context.method.as_str(), outcome])
                .inc();

            metrics
                .request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method.as_str()])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_timeout(&self, context: &RequestContext, operation_type: OperationType) {
        if let Some(metrics) = &self.metrics {
            let timeout_type = match operation_type {
                OperationType::Read => "read",
                OperationType::Write => "write",
            };
            metrics
                .timeouts_total
                .with_label_values(&[context.destination.as_str(), timeout_type])
                .inc();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.auth_token().is_some())
            .finish_non_exhaustive()
    }
}

/// Append URL-encoded query parameters to a relative API path
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}

/// The API root must end with `/` for relative joins to keep its path.
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Errors that can occur while talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status for server rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own `message`, when it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    fn is_retryable(&self, retry_on_status: &[u16]) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => retry_on_status.contains(status),
            _ => false,
        }
    }

    /// A message suitable for showing inline to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } => message.clone(),
            ApiError::Status { status: 401, .. } => {
                "Session expired or not authorised, please sign in again".to_string()
            }
            ApiError::Status { status, .. } => format!("Server returned error status {status}"),
            ApiError::Network(_) => "Service temporarily unavailable due to network issues".to_string(),
            ApiError::Timeout => "Service temporarily unavailable due to timeout".to_string(),
            ApiError::Decode(_) => "Unexpected response from server".to_string(),
            ApiError::InvalidUrl(_) => "Invalid API address".to_string(),
            ApiError::Serialization(_) => "Invalid request data".to_string(),
        }
    }
}
