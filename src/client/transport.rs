//! HTTP transport
//!
//! `HttpTransport` is the seam between the harness and the network. The
//! default implementation sends requests with reqwest; tests substitute a
//! scripted transport.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use super::types::{HttpRequest, HttpResponse, Method};
use super::ClientError;

/// Sends a single request attempt. Retries are handled by `ApiClient`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else if e.is_connect() {
            ClientError::Connection(e.to_string())
        } else if e.is_builder() {
            ClientError::InvalidRequest(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Flatten a header map, joining repeated values with ", "
fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, password.as_ref());
        }

        if let Some(body) = &request.json {
            builder = builder.json(body);
        } else if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        debug!("Executing {} {}", request.method, request.url);
        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();

        let headers = collect_headers(response.headers());

        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
            elapsed: start.elapsed(),
            request_headers: request.headers.clone(),
        })
    }
}
