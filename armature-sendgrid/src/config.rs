//! SendGrid client configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::ConfigError;

/// Default SendGrid API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com/v3";

/// Prefix of the environment variables read by [`SendGridConfig::from_env`].
pub const ENV_PREFIX: &str = "SENDGRID";

/// SendGrid client configuration.
#[derive(Clone)]
pub struct SendGridConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL all API paths are joined onto.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("armature-sendgrid/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for SendGridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl SendGridConfig {
    /// Create a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> SendGridConfigBuilder {
        SendGridConfigBuilder::default()
    }

    /// Load configuration from the environment.
    ///
    /// A `.env` file is loaded first if present. `SENDGRID_API_KEY` is
    /// required; `SENDGRID_BASE_URL`, `SENDGRID_TIMEOUT_SECS` and
    /// `SENDGRID_CONNECT_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));

        let api_key = var("API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = var("BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = var("TIMEOUT_SECS") {
            config.timeout = parse_secs("TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = var("CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = parse_secs("CONNECT_TIMEOUT_SECS", &secs)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        Ok(())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            ConfigError::Env(format!(
                "{}_{} must be a whole number of seconds, got {:?}",
                ENV_PREFIX, name, value
            ))
        })
}

pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}

/// Builder for SendGrid configuration.
#[derive(Debug, Default)]
pub struct SendGridConfigBuilder {
    config: SendGridConfig,
}

impl SendGridConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set a custom base URL (for testing or regional endpoints).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SendGridConfig {
        self.config
    }
}
