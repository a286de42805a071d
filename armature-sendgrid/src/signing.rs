//! Signed event webhook settings.

use http::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Operation, Result, SendGridClient, Transport};

/// Path of the account-wide signing settings.
pub const EVENT_WEBHOOK_SIGNING_PATH: &str = "/user/webhooks/event/settings/signed";

/// Whether SendGrid signs event webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventWebhookSigning {
    /// Signing is enabled.
    pub enabled: bool,
    /// Public key receivers verify signatures with. Populated by the server.
    pub public_key: String,
}

#[derive(Serialize)]
struct SigningToggle {
    enabled: bool,
}

impl<T: Transport> SendGridClient<T> {
    /// Enable or disable signing of event webhook payloads.
    ///
    /// Returns the resulting settings, including the public key when enabled.
    pub async fn configure_event_webhook_signing(
        &self,
        enabled: bool,
    ) -> Result<EventWebhookSigning> {
        let signing: EventWebhookSigning = self
            .execute(
                Operation::ConfigureSigning,
                Method::PATCH,
                EVENT_WEBHOOK_SIGNING_PATH,
                Some(&SigningToggle { enabled }),
            )
            .await?;

        debug!(enabled = signing.enabled, "Configured event webhook signing");
        Ok(signing)
    }

    /// Read the signing settings.
    pub async fn read_event_webhook_signing(&self) -> Result<EventWebhookSigning> {
        self.execute::<(), _>(
            Operation::ReadSigning,
            Method::GET,
            EVENT_WEBHOOK_SIGNING_PATH,
            None,
        )
        .await
    }
}
