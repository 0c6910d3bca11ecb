use std::fmt::{Display, Formatter};

use serde_json::Value;
use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

/// A failed call to the library backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `body` holds the parsed
    /// JSON error body when there was one.
    #[error("request to {url} failed with status {status}")]
    Status {
        url: String,
        status: u16,
        body: Option<Value>,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Human-readable text for the end user.
    ///
    /// Prefers the `message` field of the server's error body and falls back
    /// to describing the failure itself when no such field exists.
    pub fn message(&self) -> String {
        if let ApiError::Status {
            body: Some(body), ..
        } = self
        {
            if let Some(msg) = body.get("message").and_then(Value::as_str) {
                return msg.to_string();
            }
        }
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_body_message_field() {
        let err = ApiError::Status {
            url: "http://localhost:3333/rents/create".into(),
            status: 400,
            body: Some(json!({ "message": "Book unavailable" })),
        };
        assert_eq!(err.message(), "Book unavailable");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn message_falls_back_without_structured_body() {
        let err = ApiError::Status {
            url: "http://localhost:3333/rents/create".into(),
            status: 502,
            body: None,
        };
        assert_eq!(
            err.message(),
            "request to http://localhost:3333/rents/create failed with status 502"
        );

        let err = ApiError::Status {
            url: "http://x/books".into(),
            status: 500,
            body: Some(json!({ "error": "boom" })),
        };
        assert!(err.message().contains("500"));
    }

    #[test]
    fn with_ctx_prefixes_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk gone"));
        let err = res.with_ctx(|| "load theme".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "load theme: disk gone");
    }
}
