//! SendGrid API client.

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    ConfigError, HttpTransport, Operation, RawResponse, Result, SendGridConfig, SendGridError,
    Transport,
};

/// Client for the SendGrid event webhook settings API.
///
/// Every call issues exactly one request through the transport and returns a
/// freshly decoded record; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SendGridClient<T = HttpTransport> {
    transport: T,
}

impl SendGridClient<HttpTransport> {
    /// Create a client that talks to SendGrid over HTTP.
    pub fn new(config: SendGridConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Create an HTTP client configured from `SENDGRID_*` environment variables.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::new(SendGridConfig::from_env()?)
    }
}

impl<T: Transport> SendGridClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and decode the JSON response into `R`.
    pub(crate) async fn execute<B, R>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.dispatch(operation, method, path, body).await?;

        serde_json::from_slice(response.bytes()).map_err(|source| {
            warn!(
                operation = operation.as_str(),
                error = %source,
                "Failed to decode SendGrid response"
            );
            SendGridError::Decode { operation, source }
        })
    }

    /// Send a bodiless request whose response carries nothing of interest.
    pub(crate) async fn execute_empty(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
    ) -> Result<()> {
        self.dispatch::<()>(operation, method, path, None).await?;
        Ok(())
    }

    async fn dispatch<B>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|source| SendGridError::Encode { operation, source })?;

        debug!(
            operation = operation.as_str(),
            method = %method,
            path,
            "Calling SendGrid API"
        );

        let response = self
            .transport
            .send(method, path, payload)
            .await
            .map_err(|source| {
                warn!(
                    operation = operation.as_str(),
                    error = %source,
                    "SendGrid request failed"
                );
                SendGridError::Transport { operation, source }
            })?;

        let status = response.status().as_u16();

        if !response.is_success() {
            warn!(
                operation = operation.as_str(),
                status, "SendGrid API returned an error status"
            );
            return Err(SendGridError::Api {
                operation,
                status,
                body: response.text(),
            });
        }

        debug!(operation = operation.as_str(), status, "SendGrid API call succeeded");
        Ok(response)
    }
}
