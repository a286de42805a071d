//! Event webhook settings.
//!
//! An event webhook tells SendGrid which email lifecycle events to POST and
//! where to send them. Writes always carry the complete record, so an update
//! replaces every setting even though it travels as a PATCH.

use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::redact;
use crate::{Operation, Result, SendGridClient, SendGridError, Transport, ValidationError};

/// Collection path for event webhook settings.
pub const EVENT_WEBHOOK_SETTINGS_PATH: &str = "/user/webhooks/event/settings";

/// Event webhook settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventWebhook {
    /// Whether SendGrid posts events to this webhook.
    pub enabled: bool,
    /// Server-assigned identifier; empty until created.
    ///
    /// Always present on the wire. Create and update send it empty because
    /// the id of an existing webhook travels in the path.
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub friendly_name: String,
    /// Destination URL events are posted to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Recipient resubscribed to a suppression group.
    pub group_resubscribe: bool,
    /// Message accepted by the receiving server.
    pub delivered: bool,
    /// Recipient unsubscribed from a suppression group.
    pub group_unsubscribe: bool,
    /// Recipient marked the message as spam.
    pub spam_report: bool,
    /// Receiving server rejected the message.
    pub bounce: bool,
    /// Receiving server temporarily rejected the message.
    pub deferred: bool,
    /// Recipient unsubscribed from all email.
    pub unsubscribe: bool,
    /// Message received and ready for delivery.
    pub processed: bool,
    /// Recipient opened the message.
    pub open: bool,
    /// Recipient clicked a link.
    pub click: bool,
    /// Message dropped before delivery.
    pub dropped: bool,
    /// OAuth client id used when posting to `url`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub oauth_client_id: String,
    /// OAuth client secret used when posting to `url`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub oauth_client_secret: String,
    /// OAuth token endpoint.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub oauth_token_url: String,
}

impl fmt::Debug for EventWebhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("EventWebhook");
        s.field("enabled", &self.enabled)
            .field("id", &self.id)
            .field("friendly_name", &self.friendly_name)
            .field("url", &self.url);
        for (name, on) in self.event_flags() {
            s.field(name, &on);
        }
        s.field("oauth_client_id", &self.oauth_client_id)
            .field("oauth_client_secret", &redact(&self.oauth_client_secret))
            .field("oauth_token_url", &self.oauth_token_url)
            .finish()
    }
}

impl EventWebhook {
    /// Start building settings that post to `url`.
    pub fn builder(url: impl Into<String>) -> EventWebhookBuilder {
        EventWebhookBuilder::new(url)
    }

    /// The event category flags, keyed by their wire names.
    pub fn event_flags(&self) -> [(&'static str, bool); 11] {
        [
            ("group_resubscribe", self.group_resubscribe),
            ("delivered", self.delivered),
            ("group_unsubscribe", self.group_unsubscribe),
            ("spam_report", self.spam_report),
            ("bounce", self.bounce),
            ("deferred", self.deferred),
            ("unsubscribe", self.unsubscribe),
            ("processed", self.processed),
            ("open", self.open),
            ("click", self.click),
            ("dropped", self.dropped),
        ]
    }

    /// Check if OAuth delivery is configured.
    pub fn uses_oauth(&self) -> bool {
        !self.oauth_client_id.is_empty()
    }

    /// Check the settings can be submitted.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        Ok(())
    }

    /// The record as sent on create and update; the id travels in the path.
    fn write_payload(&self) -> Self {
        Self {
            id: String::new(),
            ..self.clone()
        }
    }
}

/// Builder for [`EventWebhook`].
#[derive(Debug, Clone)]
pub struct EventWebhookBuilder {
    webhook: EventWebhook,
}

impl EventWebhookBuilder {
    /// Create a builder for an enabled webhook with no events selected.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            webhook: EventWebhook {
                enabled: true,
                url: url.into(),
                ..Default::default()
            },
        }
    }

    /// Enable or disable the webhook.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.webhook.enabled = enabled;
        self
    }

    /// Set the display name.
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.webhook.friendly_name = name.into();
        self
    }

    /// Select every event category.
    pub fn all_events(self) -> Self {
        self.group_resubscribe(true)
            .delivered(true)
            .group_unsubscribe(true)
            .spam_report(true)
            .bounce(true)
            .deferred(true)
            .unsubscribe(true)
            .processed(true)
            .open(true)
            .click(true)
            .dropped(true)
    }

    /// Notify on group resubscribes.
    pub fn group_resubscribe(mut self, on: bool) -> Self {
        self.webhook.group_resubscribe = on;
        self
    }

    /// Notify on deliveries.
    pub fn delivered(mut self, on: bool) -> Self {
        self.webhook.delivered = on;
        self
    }

    /// Notify on group unsubscribes.
    pub fn group_unsubscribe(mut self, on: bool) -> Self {
        self.webhook.group_unsubscribe = on;
        self
    }

    /// Notify on spam reports.
    pub fn spam_report(mut self, on: bool) -> Self {
        self.webhook.spam_report = on;
        self
    }

    /// Notify on bounces.
    pub fn bounce(mut self, on: bool) -> Self {
        self.webhook.bounce = on;
        self
    }

    /// Notify on deferrals.
    pub fn deferred(mut self, on: bool) -> Self {
        self.webhook.deferred = on;
        self
    }

    /// Notify on unsubscribes.
    pub fn unsubscribe(mut self, on: bool) -> Self {
        self.webhook.unsubscribe = on;
        self
    }

    /// Notify when messages are processed.
    pub fn processed(mut self, on: bool) -> Self {
        self.webhook.processed = on;
        self
    }

    /// Notify on opens.
    pub fn open(mut self, on: bool) -> Self {
        self.webhook.open = on;
        self
    }

    /// Notify on clicks.
    pub fn click(mut self, on: bool) -> Self {
        self.webhook.click = on;
        self
    }

    /// Notify on drops.
    pub fn dropped(mut self, on: bool) -> Self {
        self.webhook.dropped = on;
        self
    }

    /// Deliver events using OAuth client credentials.
    pub fn oauth(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.webhook.oauth_client_id = client_id.into();
        self.webhook.oauth_client_secret = client_secret.into();
        self.webhook.oauth_token_url = token_url.into();
        self
    }

    /// Build the settings.
    pub fn build(self) -> EventWebhook {
        self.webhook
    }
}

/// Path of a single webhook, with `id` percent-encoded as one segment.
fn settings_path(operation: Operation, id: &str) -> Result<String> {
    match id {
        "" => Err(SendGridError::validation(operation, ValidationError::MissingId)),
        // dot segments are unreserved and would be normalised away
        "." | ".." => Err(SendGridError::validation(
            operation,
            ValidationError::InvalidId(id.to_string()),
        )),
        _ => Ok(format!(
            "{}/{}",
            EVENT_WEBHOOK_SETTINGS_PATH,
            urlencoding::encode(id)
        )),
    }
}

fn validate_settings(operation: Operation, webhook: &EventWebhook) -> Result<()> {
    webhook
        .validate()
        .map_err(|source| SendGridError::validation(operation, source))
}

impl<T: Transport> SendGridClient<T> {
    /// Create an event webhook.
    ///
    /// Returns the server's copy, including the assigned id. Fails without
    /// sending anything if `webhook.url` is empty.
    pub async fn create_event_webhook(&self, webhook: &EventWebhook) -> Result<EventWebhook> {
        let operation = Operation::CreateEventWebhook;
        validate_settings(operation, webhook)?;

        let created: EventWebhook = self
            .execute(
                operation,
                Method::POST,
                EVENT_WEBHOOK_SETTINGS_PATH,
                Some(&webhook.write_payload()),
            )
            .await?;

        debug!(
            id = %created.id,
            oauth = webhook.uses_oauth(),
            "Created event webhook"
        );
        Ok(created)
    }

    /// Read an event webhook.
    pub async fn read_event_webhook(&self, id: &str) -> Result<EventWebhook> {
        let operation = Operation::ReadEventWebhook;
        let path = settings_path(operation, id)?;

        self.execute::<(), _>(operation, Method::GET, &path, None)
            .await
    }

    /// Replace the settings of an event webhook.
    pub async fn update_event_webhook(
        &self,
        id: &str,
        webhook: &EventWebhook,
    ) -> Result<EventWebhook> {
        let operation = Operation::UpdateEventWebhook;
        let path = settings_path(operation, id)?;
        validate_settings(operation, webhook)?;

        let updated: EventWebhook = self
            .execute(
                operation,
                Method::PATCH,
                &path,
                Some(&webhook.write_payload()),
            )
            .await?;

        debug!(id, oauth = webhook.uses_oauth(), "Updated event webhook");
        Ok(updated)
    }

    /// Delete an event webhook.
    pub async fn delete_event_webhook(&self, id: &str) -> Result<()> {
        let operation = Operation::DeleteEventWebhook;
        let path = settings_path(operation, id)?;

        self.execute_empty(operation, Method::DELETE, &path).await?;

        debug!(id, "Deleted event webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransportError;
    use crate::testing::StubTransport;
    use http::StatusCode;
    use serde_json::json;

    fn full_webhook() -> EventWebhook {
        EventWebhook::builder("https://hooks.example.com/sendgrid")
            .friendly_name("primary")
            .all_events()
            .oauth("client", "secret", "https://auth.example.com/token")
            .build()
    }

    const CREATED: &str = r#"{
        "enabled": true,
        "id": "wh_1",
        "friendly_name": "primary",
        "url": "https://hooks.example.com/sendgrid",
        "group_resubscribe": true,
        "delivered": true,
        "group_unsubscribe": false,
        "spam_report": true,
        "bounce": true,
        "deferred": false,
        "unsubscribe": false,
        "processed": false,
        "open": true,
        "click": true,
        "dropped": false
    }"#;

    #[test]
    fn test_round_trip_with_everything_set() {
        let mut webhook = full_webhook();
        webhook.id = "wh_1".to_string();

        let encoded = serde_json::to_string(&webhook).unwrap();
        let decoded: EventWebhook = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, webhook);
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let webhook = EventWebhook {
            url: "https://hooks.example.com".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&webhook).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "friendly_name",
            "oauth_client_id",
            "oauth_client_secret",
            "oauth_token_url",
        ] {
            assert!(!object.contains_key(key), "{key} should be omitted");
        }
        for (name, _) in webhook.event_flags() {
            assert_eq!(object.get(name), Some(&json!(false)));
        }
        assert_eq!(object.get("enabled"), Some(&json!(false)));
        assert_eq!(object.get("id"), Some(&json!("")));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            EventWebhook::default().validate(),
            Err(ValidationError::MissingUrl)
        );
        assert!(EventWebhook::builder("https://x").build().validate().is_ok());
    }

    #[test]
    fn test_missing_keys_decode_to_defaults() {
        let decoded: EventWebhook =
            serde_json::from_str(r#"{"enabled":true,"url":"https://x"}"#).unwrap();

        assert!(decoded.enabled);
        assert_eq!(decoded.id, "");
        assert_eq!(decoded.friendly_name, "");
        assert_eq!(decoded.oauth_client_secret, "");
        assert!(!decoded.bounce);
    }

    #[test]
    fn test_builder() {
        let webhook = EventWebhook::builder("https://x")
            .enabled(false)
            .bounce(true)
            .dropped(true)
            .build();

        assert!(!webhook.enabled);
        assert!(webhook.bounce);
        assert!(webhook.dropped);
        assert!(!webhook.open);
        assert!(!webhook.uses_oauth());

        let all = EventWebhook::builder("https://x").all_events().build();
        assert!(all.event_flags().iter().all(|(_, on)| *on));
        assert!(all.enabled);
    }

    #[test]
    fn test_debug_redacts_oauth_secret() {
        let debug = format!("{:?}", full_webhook());
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("***"));
        assert!(debug.contains("spam_report"));
    }

    #[tokio::test]
    async fn test_create_posts_full_record() {
        let stub = StubTransport::responding(StatusCode::CREATED, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        let created = client.create_event_webhook(&full_webhook()).await.unwrap();
        assert_eq!(created.id, "wh_1");
        assert!(!created.deferred);

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].path, "/user/webhooks/event/settings");

        let body = calls[0].json_body().unwrap();
        assert_eq!(body["url"], "https://hooks.example.com/sendgrid");
        assert_eq!(body["group_resubscribe"], true);
        assert_eq!(body["oauth_token_url"], "https://auth.example.com/token");
        assert_eq!(body["id"], "");
        assert_eq!(body.as_object().unwrap().len(), 18);
    }

    #[tokio::test]
    async fn test_create_requires_url() {
        let stub = StubTransport::responding(StatusCode::CREATED, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        let webhook = EventWebhook {
            bounce: true,
            ..Default::default()
        };
        let err = client.create_event_webhook(&webhook).await.unwrap_err();

        assert!(matches!(
            err,
            SendGridError::Validation {
                source: ValidationError::MissingUrl,
                ..
            }
        ));
        assert_eq!(err.status_code(), 500);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_url() {
        let stub = StubTransport::responding(StatusCode::OK, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        let err = client
            .update_event_webhook("wh_1", &EventWebhook::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SendGridError::Validation {
                operation: Operation::UpdateEventWebhook,
                ..
            }
        ));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_empty_id_in_body() {
        let stub = StubTransport::responding(StatusCode::OK, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        let mut webhook = full_webhook();
        webhook.id = "wh_1".to_string();
        client.update_event_webhook("wh_1", &webhook).await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].method, Method::PATCH);
        assert_eq!(calls[0].path, "/user/webhooks/event/settings/wh_1");
        assert_eq!(calls[0].json_body().unwrap()["id"], "");
    }

    #[tokio::test]
    async fn test_write_api_errors_carry_status_and_body() {
        for status in [
            StatusCode::MULTIPLE_CHOICES,
            StatusCode::BAD_REQUEST,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let stub = StubTransport::responding(status, r#"{"errors":[{"message":"nope"}]}"#);
            let client = SendGridClient::with_transport(stub);

            let results = [
                client.create_event_webhook(&full_webhook()).await.map(|_| ()),
                client.update_event_webhook("wh_1", &full_webhook()).await.map(|_| ()),
                client.delete_event_webhook("wh_1").await,
            ];

            for result in results {
                let err = result.unwrap_err();
                assert_eq!(err.status_code(), status.as_u16());
                assert_eq!(
                    err.response_body(),
                    Some(r#"{"errors":[{"message":"nope"}]}"#)
                );
            }
        }
    }

    #[tokio::test]
    async fn test_read_fetches_by_id() {
        let stub = StubTransport::responding(StatusCode::OK, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        let webhook = client.read_event_webhook("wh_1").await.unwrap();
        assert_eq!(webhook.friendly_name, "primary");
        assert!(webhook.spam_report);

        let calls = stub.calls();
        assert_eq!(calls[0].method, Method::GET);
        assert_eq!(calls[0].path, "/user/webhooks/event/settings/wh_1");
        assert!(calls[0].body.is_none());
    }

    #[tokio::test]
    async fn test_read_missing_is_api_error() {
        let stub = StubTransport::responding(
            StatusCode::NOT_FOUND,
            r#"{"errors":[{"field":null,"message":"not found"}]}"#,
        );
        let client = SendGridClient::with_transport(stub);

        let err = client.read_event_webhook("missing_id").await.unwrap_err();

        assert!(matches!(err, SendGridError::Api { status: 404, .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_no_content() {
        let stub = StubTransport::responding(StatusCode::NO_CONTENT, "");
        let client = SendGridClient::with_transport(stub.clone());

        client.delete_event_webhook("wh_1").await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].method, Method::DELETE);
        assert_eq!(calls[0].path, "/user/webhooks/event/settings/wh_1");
        assert!(calls[0].body.is_none());
    }

    #[tokio::test]
    async fn test_invalid_ids_never_reach_transport() {
        let stub = StubTransport::responding(StatusCode::OK, CREATED);
        let client = SendGridClient::with_transport(stub.clone());

        for id in ["", ".", ".."] {
            assert!(matches!(
                client.read_event_webhook(id).await,
                Err(SendGridError::Validation { .. })
            ));
            assert!(matches!(
                client.delete_event_webhook(id).await,
                Err(SendGridError::Validation { .. })
            ));
            assert!(matches!(
                client.update_event_webhook(id, &full_webhook()).await,
                Err(SendGridError::Validation { .. })
            ));
        }

        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_encoded_as_one_segment() {
        let stub = StubTransport::responding(StatusCode::NO_CONTENT, "");
        let client = SendGridClient::with_transport(stub.clone());

        for id in ["a/b", "%2e%2e", "a?b#c", "../signed"] {
            client.delete_event_webhook(id).await.unwrap();
        }

        let paths: Vec<String> = stub.calls().into_iter().map(|call| call.path).collect();
        assert_eq!(
            paths,
            [
                "/user/webhooks/event/settings/a%2Fb",
                "/user/webhooks/event/settings/%252e%252e",
                "/user/webhooks/event/settings/a%3Fb%23c",
                "/user/webhooks/event/settings/..%2Fsigned",
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_on_every_operation() {
        let stub =
            StubTransport::failing(|| TransportError::Other("connection reset".to_string()));
        let client = SendGridClient::with_transport(stub.clone());

        let errors = [
            client.create_event_webhook(&full_webhook()).await.unwrap_err(),
            client.read_event_webhook("wh_1").await.unwrap_err(),
            client.update_event_webhook("wh_1", &full_webhook()).await.unwrap_err(),
            client.delete_event_webhook("wh_1").await.unwrap_err(),
        ];

        for err in errors {
            assert!(matches!(err, SendGridError::Transport { .. }));
            assert_eq!(err.status_code(), 500);
        }
        assert_eq!(stub.calls().len(), 4);
    }
}
