//! HTTP transport to the Motion REST API.
//!
//! Calls are blocking: a mode invocation holds the calling thread until
//! Motion answers or the retry budget is spent.

use std::thread;
use std::time::{Duration, SystemTime};

use rand::Rng;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, RETRY_AFTER};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{HttpSettings, MotionConfig};
use crate::error::{ConfigError, MotionError, Result};

const API_KEY_HEADER: &str = "X-API-Key";
const USER_AGENT: &str = concat!("motion-toolkit/", env!("CARGO_PKG_VERSION"));

/// Headers the transport owns; caller-supplied copies are dropped.
const RESERVED_HEADERS: &[&str] = &["x-api-key", "host", "accept"];

/// One outbound call, relative to the instance URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Something that can deliver an [`ApiRequest`] to Motion.
///
/// Returns the response body as JSON when it parses, the raw text when it
/// does not, and `null` for an empty body.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<Value>;
}

/// Bounded retry with exponential backoff and jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn from_settings(http: &HttpSettings) -> Self {
        Self {
            max_retries: http.max_retries,
            base_delay: Duration::from_millis(http.retry_base_delay_ms),
            ..Self::default()
        }
    }

    /// `attempt` is 1-based and counts the request that just failed.
    pub fn should_retry_status(&self, method: &Method, status: StatusCode, attempt: u32) -> bool {
        attempt <= self.max_retries
            && is_replayable(method)
            && (status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
    }

    pub fn should_retry_error(&self, method: &Method, err: &reqwest::Error, attempt: u32) -> bool {
        if attempt > self.max_retries {
            return false;
        }
        // A refused connection never reached Motion, so even POST is safe.
        err.is_connect() || (err.is_timeout() && is_replayable(method))
    }

    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait.min(self.max_delay);
        }
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exponent);
        let jitter_ms = (self.base_delay.as_millis() as u64) / 2;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
        };
        (backoff + jitter).min(self.max_delay)
    }
}

fn is_replayable(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::DELETE | Method::HEAD)
}

/// The production transport: `reqwest::blocking` with an API-key header.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}

impl HttpTransport {
    /// Build from configuration. Fails when the API key is missing, the
    /// instance URL is not an absolute http(s) URL or the timeout is zero.
    pub fn from_config(config: &MotionConfig) -> std::result::Result<Self, ConfigError> {
        let api_key = config.api_key()?.to_string();
        let base_url = config.base_url()?;
        if config.http.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self::with_client(
            client,
            base_url,
            api_key,
            RetryPolicy::from_settings(&config.http),
        ))
    }

    pub fn with_client(
        client: reqwest::blocking::Client,
        base_url: Url,
        api_key: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path)).map_err(|e| {
            MotionError::Decode(format!("invalid request path {}: {e}", request.path))
        })?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url_for(request)?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut builder = self
                .client
                .request(request.method.clone(), url.clone())
                .header(API_KEY_HEADER, &self.api_key)
                .header(ACCEPT, "application/json");
            for (key, value) in forwarded_headers(request) {
                builder = builder.header(key, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            debug!(method = %request.method, path = %request.path, attempt, "sending request");
            let response = match builder.send() {
                Ok(response) => response,
                Err(err) if self.retry.should_retry_error(&request.method, &err, attempt) => {
                    let wait = self.retry.delay(attempt, None);
                    warn!(
                        error = %err,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "request failed, retrying"
                    );
                    thread::sleep(wait);
                    continue;
                }
                Err(err) => return Err(MotionError::Transport(err)),
            };

            let status = response.status();
            if status.is_success() {
                let text = response.text().map_err(MotionError::Transport)?;
                debug!(status = status.as_u16(), bytes = text.len(), "response received");
                return Ok(normalize_body(&text));
            }

            let retry_after = retry_after(response.headers());
            let body = response.text().unwrap_or_default();
            if self
                .retry
                .should_retry_status(&request.method, status, attempt)
            {
                let wait = self.retry.delay(attempt, retry_after);
                warn!(
                    status = status.as_u16(),
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Motion returned an error, retrying"
                );
                thread::sleep(wait);
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(MotionError::NotFound {
                    path: request.path.clone(),
                });
            }
            return Err(MotionError::Api {
                status: status.as_u16(),
                method: request.method.to_string(),
                path: request.path.clone(),
                body,
            });
        }
    }
}

/// Caller headers minus the ones the transport sets itself.
fn forwarded_headers(request: &ApiRequest) -> impl Iterator<Item = (&str, &str)> {
    request.headers.iter().filter_map(|(key, value)| {
        if RESERVED_HEADERS
            .iter()
            .any(|reserved| key.trim().eq_ignore_ascii_case(reserved))
        {
            warn!(header = %key, "dropping reserved header");
            None
        } else {
            Some((key.as_str(), value.as_str()))
        }
    })
}

/// JSON when the body parses, the raw text when it does not.
pub fn normalize_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// `Retry-After` as either delta-seconds or an HTTP date.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = httpdate::parse_http_date(raw).ok()?;
    Some(at.duration_since(SystemTime::now()).unwrap_or(Duration::ZERO))
}
