//! Blocking HTTP implementation of [`LibraryApi`](super::LibraryApi).

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{Book, LibraryApi, RentRequest, User};
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join a relative endpoint path onto the base URL with exactly one `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

pub struct HttpApi {
    config: ApiConfig,
    client: Client,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self { config, client })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        let (status, text) = self.execute(&url, self.client.get(&url))?;
        decode_response(&url, status, &text)
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let (status, text) = self.execute(&url, self.client.post(&url).json(body))?;
        accept_response(&url, status, &text)
    }

    fn execute(&self, url: &str, req: RequestBuilder) -> Result<(u16, String), ApiError> {
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = req.send().map_err(transport)?;
        let status = resp.status().as_u16();
        let text = resp.text().map_err(transport)?;
        Ok((status, text))
    }
}

impl LibraryApi for HttpApi {
    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("users")
    }

    fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get_json("books")
    }

    fn create_rent(&self, req: &RentRequest) -> Result<Value, ApiError> {
        self.post_json("rents/create", req)
    }
}

fn status_error(url: &str, status: u16, text: &str) -> Option<ApiError> {
    if (200..300).contains(&status) {
        return None;
    }
    Some(ApiError::Status {
        url: url.to_string(),
        status,
        body: serde_json::from_str(text).ok(),
    })
}

/// Turn a raw status/body pair into either the decoded payload or an [`ApiError`].
///
/// An empty success body decodes as JSON `null`.
pub fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: u16,
    text: &str,
) -> Result<T, ApiError> {
    if let Some(err) = status_error(url, status, text) {
        return Err(err);
    }
    let decode = |source| ApiError::Decode {
        url: url.to_string(),
        source,
    };
    let value: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).map_err(decode)?
    };
    serde_json::from_value(value).map_err(decode)
}

/// Like [`decode_response`] but the status alone decides success.
///
/// A 2xx body that is not JSON comes back as a `Value::String` holding the
/// raw text; an empty one as `null`.
pub fn accept_response(url: &str, status: u16, text: &str) -> Result<Value, ApiError> {
    if let Some(err) = status_error(url, status, text) {
        return Err(err);
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
