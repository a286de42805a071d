//! # Armature SendGrid
//!
//! Typed client for SendGrid's event webhook settings API.
//!
//! ## Features
//!
//! - **Event Webhooks**: Create, read, update and delete the settings that tell
//!   SendGrid which email events to post and where
//! - **Signed Webhooks**: Enable payload signing and fetch the verification key
//! - **Classified Errors**: Validation, transport, API and decode failures are
//!   distinct variants carrying the operation and HTTP status
//! - **Pluggable Transport**: reqwest by default, any [`Transport`] for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armature_sendgrid::{EventWebhook, SendGridClient, SendGridConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SendGridClient::new(SendGridConfig::new("SG.xxxxx"))?;
//!
//!     let settings = EventWebhook::builder("https://hooks.example.com/sendgrid")
//!         .friendly_name("production")
//!         .delivered(true)
//!         .bounce(true)
//!         .dropped(true)
//!         .build();
//!
//!     let created = client.create_event_webhook(&settings).await?;
//!     println!("Created webhook {}", created.id);
//!
//!     let signing = client.configure_event_webhook_signing(true).await?;
//!     println!("Verify payloads with {}", signing.public_key);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Nothing is retried internally. Use [`SendGridError::is_retryable`] to
//! decide whether to try again, and [`SendGridError::status_code`] for a
//! best-effort HTTP status.

mod client;
mod config;
mod error;
mod event_webhook;
mod response;
mod signing;
mod transport;

#[cfg(test)]
mod testing;

pub use client::SendGridClient;
pub use config::{DEFAULT_BASE_URL, ENV_PREFIX, SendGridConfig, SendGridConfigBuilder};
pub use error::{
    ConfigError, LOCAL_FAILURE_STATUS, Operation, Result, SendGridError, TransportError,
    ValidationError,
};
pub use event_webhook::{EVENT_WEBHOOK_SETTINGS_PATH, EventWebhook, EventWebhookBuilder};
pub use response::RawResponse;
pub use signing::{EVENT_WEBHOOK_SIGNING_PATH, EventWebhookSigning};
pub use transport::{HttpTransport, Transport};

// Re-export common types
pub use http::{Method, StatusCode};

/// Prelude for common imports.
///
/// ```
/// use armature_sendgrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::SendGridClient;
    pub use crate::config::{SendGridConfig, SendGridConfigBuilder};
    pub use crate::error::{
        ConfigError, Operation, Result, SendGridError, TransportError, ValidationError,
    };
    pub use crate::event_webhook::{EventWebhook, EventWebhookBuilder};
    pub use crate::signing::EventWebhookSigning;
    pub use crate::transport::{HttpTransport, Transport};
}
