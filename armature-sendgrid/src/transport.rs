//! Transport implementations.

use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use tracing::debug;

use crate::{ConfigError, RawResponse, SendGridConfig, TransportError};

/// Transport trait.
///
/// Performs one HTTP exchange against a path relative to the API base URL.
/// Authentication, pooling and deadlines are the implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request. `body` is a serialized JSON document, if any.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        (**self).send(method, path, body).await
    }
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: SendGridConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: SendGridConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            // a 3xx is reported to the caller, never followed
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &SendGridConfig {
        &self.config
    }

    fn url_for(&self, path: &str) -> Result<url::Url, TransportError> {
        let base = self.config.base_url.trim_end_matches('/');
        let full = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };
        url::Url::parse(&full)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", full, e)))
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.config.timeout)
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url_for(path)?;

        debug!(method = %method, url = %url, "Sending SendGrid API request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json");

        if let Some(body) = body {
            request = request.header("Content-Type", "application/json").body(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        Ok(RawResponse::new(status, body))
    }
}
