//! SendGrid client error types.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for SendGrid operations.
pub type Result<T> = std::result::Result<T, SendGridError>;

/// Status reported for failures that never produced a server response.
pub const LOCAL_FAILURE_STATUS: u16 = 500;

/// The API operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Creating an event webhook.
    CreateEventWebhook,
    /// Reading an event webhook.
    ReadEventWebhook,
    /// Updating an event webhook.
    UpdateEventWebhook,
    /// Deleting an event webhook.
    DeleteEventWebhook,
    /// Enabling or disabling event webhook signing.
    ConfigureSigning,
    /// Reading the event webhook signing settings.
    ReadSigning,
}

impl Operation {
    /// Short machine-friendly name, used as a tracing field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateEventWebhook => "create_event_webhook",
            Self::ReadEventWebhook => "read_event_webhook",
            Self::UpdateEventWebhook => "update_event_webhook",
            Self::DeleteEventWebhook => "delete_event_webhook",
            Self::ConfigureSigning => "configure_event_webhook_signing",
            Self::ReadSigning => "read_event_webhook_signing",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Self::CreateEventWebhook => "creating event webhook",
            Self::ReadEventWebhook => "reading event webhook",
            Self::UpdateEventWebhook => "updating event webhook",
            Self::DeleteEventWebhook => "deleting event webhook",
            Self::ConfigureSigning => "configuring event webhook signing",
            Self::ReadSigning => "reading event webhook signing",
        };
        f.write_str(action)
    }
}

/// SendGrid client errors.
#[derive(Debug, Error)]
pub enum SendGridError {
    /// A local precondition failed; no request was sent.
    #[error("failed {operation}: {source}")]
    Validation {
        /// Operation that was rejected.
        operation: Operation,
        /// What was wrong with the input.
        #[source]
        source: ValidationError,
    },

    /// The request could not be completed.
    #[error("failed {operation}: {source}")]
    Transport {
        /// Operation in flight.
        operation: Operation,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The server answered with a status of 300 or above.
    #[error("failed {operation}, status: {status}, response: {body}")]
    Api {
        /// Operation in flight.
        operation: Operation,
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed {operation}: could not decode response: {source}")]
    Decode {
        /// Operation in flight.
        operation: Operation,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed {operation}: could not encode request: {source}")]
    Encode {
        /// Operation in flight.
        operation: Operation,
        /// JSON encoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl SendGridError {
    pub(crate) fn validation(operation: Operation, source: ValidationError) -> Self {
        Self::Validation { operation, source }
    }

    /// The operation this error came from.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Validation { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Api { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Encode { operation, .. } => *operation,
        }
    }

    /// Best-effort HTTP status for this error.
    ///
    /// API errors report the server's status; everything else reports 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            _ => LOCAL_FAILURE_STATUS,
        }
    }

    /// Raw response body of an API error.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Input rejected before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Event webhook settings have no target URL.
    #[error("url is required")]
    MissingUrl,

    /// No webhook id was given.
    #[error("webhook id is required")]
    MissingId,

    /// The id would not address a single webhook.
    #[error("webhook id {0:?} is not a valid path segment")]
    InvalidId(String),
}

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure, used by custom transports.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key was configured.
    #[error("SendGrid API key is missing")]
    MissingApiKey,

    /// Base URL is not an absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// An environment variable held an unusable value.
    #[error("environment error: {0}")]
    Env(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
