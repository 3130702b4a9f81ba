//! API client - base URL resolution, auth, logging and retry

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::transport::{HttpTransport, ReqwestTransport};
use super::types::{HttpRequest, HttpResponse, Method, RequestOptions};
use super::ClientError;
use crate::config::{Credentials, HarnessConfig};
use crate::logging::ApiLogger;

pub struct ApiClient {
    config: HarnessConfig,
    transport: Arc<dyn HttpTransport>,
    logger: Option<ApiLogger>,
    default_headers: BTreeMap<String, String>,
}

impl ApiClient {
    /// Client sending over reqwest
    pub fn new(config: HarnessConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(
        config: HarnessConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            logger: None,
            default_headers: BTreeMap::new(),
        })
    }

    /// Log every request attempt and response through `logger`
    pub fn with_logger(mut self, logger: ApiLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Header sent with every request unless overridden per request
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if endpoint.is_empty() {
            return base.to_string();
        }
        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{}", endpoint)
        };
        format!("{}{}", base, endpoint)
    }

    fn prepare(&self, method: Method, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        let mut basic_auth = None;

        match self.config.credentials() {
            Some(Credentials::Bearer { token }) => {
                headers.insert("Authorization".to_string(), format!("Bearer {}", token));
            }
            Some(Credentials::Basic { username, password }) => {
                basic_auth = Some((username, password));
            }
            None => {}
        }

        headers.extend(options.headers);

        HttpRequest {
            method,
            url: self.build_url(endpoint),
            headers,
            query: options.query,
            json: options.json,
            form: options.form,
            basic_auth,
            timeout: self.config.timeout_duration(),
        }
    }

    /// Send a request, retrying transport failures with a fixed delay.
    ///
    /// `options.endpoint` is ignored here; callers resolve it before calling.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        let log_body = options.loggable_body();
        let request = self.prepare(method, endpoint, options);
        let max_attempts = self.config.retry_attempts.saturating_add(1);
        let delay = self.config.retry_delay_duration();

        let mut attempt = 0;
        loop {
            attempt += 1;

            let request_timestamp = self.logger.as_ref().map(|logger| {
                logger.log_request(
                    method.as_str(),
                    &request.url,
                    &request.headers,
                    log_body.as_ref(),
                )
            });

            match self.transport.send(&request).await {
                Ok(mut response) => {
                    response.request_headers = request.headers.clone();
                    if let (Some(logger), Some(started)) = (&self.logger, request_timestamp) {
                        logger.log_response(
                            response.status,
                            &response.headers,
                            response.loggable_body().as_ref(),
                            started,
                        );
                    }
                    info!(
                        "{} {} -> {} ({}ms)",
                        method,
                        request.url,
                        response.status,
                        response.elapsed.as_millis()
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        error = %e,
                        "Retrying request (attempt {}/{}) after {:?}",
                        attempt + 1,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, attempts = attempt, "Request failed, retries exhausted");
                    return Err(ClientError::RetryExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn get(
        &self,
        endpoint: &str,
        query: Option<BTreeMap<String, String>>,
    ) -> Result<HttpResponse, ClientError> {
        let options = RequestOptions {
            query: query.unwrap_or_default(),
            ..RequestOptions::default()
        };
        self.request(Method::Get, endpoint, options).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        json: Option<Value>,
        form: Option<BTreeMap<String, String>>,
    ) -> Result<HttpResponse, ClientError> {
        let options = RequestOptions {
            json,
            form,
            ..RequestOptions::default()
        };
        self.request(Method::Post, endpoint, options).await
    }

    pub async fn put(&self, endpoint: &str, json: Option<Value>) -> Result<HttpResponse, ClientError> {
        let options = RequestOptions {
            json,
            ..RequestOptions::default()
        };
        self.request(Method::Put, endpoint, options).await
    }

    pub async fn patch(&self, endpoint: &str, json: Option<Value>) -> Result<HttpResponse, ClientError> {
        let options = RequestOptions {
            json,
            ..RequestOptions::default()
        };
        self.request(Method::Patch, endpoint, options).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<HttpResponse, ClientError> {
        self.request(Method::Delete, endpoint, RequestOptions::default())
            .await
    }
}
