//! HTTP client used by API tests
//!
//! - `types` - Methods, request options, requests and responses
//! - `transport` - The `HttpTransport` seam and its reqwest implementation
//! - `api` - `ApiClient`: base URL, auth, request logging and retry

pub mod api;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{HttpRequest, HttpResponse, Method, RequestOptions};

use crate::config::ConfigError;

/// Errors raised while sending requests
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Connection(_) | ClientError::Transport(_)
        )
    }
}
