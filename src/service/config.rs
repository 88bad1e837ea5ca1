//! Gateway configuration.

use crate::providers::five_sim::client::DEFAULT_API_URL as FIVE_SIM_API_URL;
use crate::providers::sms_activate::client::DEFAULT_API_URL as SMS_ACTIVATE_API_URL;
use crate::providers::ProviderError;
use crate::types::{ProviderKind, UnknownProviderError};
use crate::utils::http::DEFAULT_REQUEST_TIMEOUT;
use secrecy::SecretString;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the sms-activate API key.
pub const ENV_SMS_ACTIVATE_API_KEY: &str = "SMS_ACTIVATE_API_KEY";
/// Environment variable holding the 5sim API token.
pub const ENV_FIVE_SIM_API_KEY: &str = "FIVE_SIM_API_KEY";
/// Environment variable naming the provider used when a request names none.
pub const ENV_DEFAULT_PROVIDER: &str = "DEFAULT_PROVIDER";
/// Environment variable overriding the sms-activate handler URL.
pub const ENV_SMS_ACTIVATE_API_URL: &str = "SMS_ACTIVATE_API_URL";
/// Environment variable overriding the 5sim base URL.
pub const ENV_FIVE_SIM_API_URL: &str = "FIVE_SIM_API_URL";
/// Environment variable holding the outbound request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SMS_GATEWAY_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `DEFAULT_PROVIDER` names no known provider.
    #[error("Invalid DEFAULT_PROVIDER: {0}")]
    UnknownProvider(#[from] UnknownProviderError),

    /// An endpoint override is not a valid URL.
    #[error("Invalid URL in {var}: '{value}': {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// A numeric variable could not be parsed or is out of range.
    #[error("Invalid value in {var}: '{value}' ({reason})")]
    InvalidNumber {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The shared HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A provider client rejected its settings.
    #[error("Invalid {provider} settings: {source}")]
    ProviderSetup {
        provider: ProviderKind,
        #[source]
        source: ProviderError,
    },
}

/// Connection settings of one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API endpoint (sms-activate handler URL, 5sim base URL).
    pub endpoint: Url,
    /// API credential; `None` leaves the provider unconfigured.
    pub api_key: Option<SecretString>,
}

impl ProviderSettings {
    /// Returns true when a credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Configuration of the SMS gateway.
///
/// Built once at startup and handed to [`crate::SmsGateway::from_config`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// sms-activate connection settings.
    pub sms_activate: ProviderSettings,
    /// 5sim connection settings.
    pub five_sim: ProviderSettings,
    /// Provider used when a request names none.
    pub default_provider: ProviderKind,
    /// Timeout applied to every outbound provider call.
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Create a new builder for GatewayConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sms_gateway::{GatewayConfig, ProviderKind};
    /// use std::time::Duration;
    ///
    /// let config = GatewayConfig::builder()
    ///     .five_sim_api_key("token")
    ///     .default_provider(ProviderKind::FiveSim)
    ///     .request_timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(config.five_sim.is_configured());
    /// assert!(!config.sms_activate.is_configured());
    /// assert_eq!(config.request_timeout, Duration::from_secs(10));
    /// ```
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load the configuration from an explicit set of variables.
    ///
    /// Blank values count as unset.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let lookup = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let mut builder = Self::builder();

        if let Some(key) = lookup(ENV_SMS_ACTIVATE_API_KEY) {
            builder = builder.sms_activate_api_key(key);
        }
        if let Some(key) = lookup(ENV_FIVE_SIM_API_KEY) {
            builder = builder.five_sim_api_key(key);
        }
        if let Some(name) = lookup(ENV_DEFAULT_PROVIDER) {
            builder = builder.default_provider(name.parse()?);
        }
        if let Some(url) = lookup(ENV_SMS_ACTIVATE_API_URL) {
            builder = builder.sms_activate_endpoint(parse_url(ENV_SMS_ACTIVATE_API_URL, url)?);
        }
        if let Some(url) = lookup(ENV_FIVE_SIM_API_URL) {
            builder = builder.five_sim_endpoint(parse_url(ENV_FIVE_SIM_API_URL, url)?);
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            builder = builder.request_timeout(parse_timeout(secs)?);
        }

        builder.build()
    }

    /// Settings of the given provider.
    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::SmsActivate => &self.sms_activate,
            ProviderKind::FiveSim => &self.five_sim,
        }
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        source,
    })
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidNumber {
            var: ENV_REQUEST_TIMEOUT_SECS,
            value: value.to_string(),
            reason: "must be positive",
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError::InvalidNumber {
            var: ENV_REQUEST_TIMEOUT_SECS,
            value: value.to_string(),
            reason: "expected whole seconds",
        }),
    }
}

/// Builder for GatewayConfig.
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    sms_activate_api_key: Option<SecretString>,
    sms_activate_endpoint: Option<Url>,
    five_sim_api_key: Option<SecretString>,
    five_sim_endpoint: Option<Url>,
    default_provider: ProviderKind,
    request_timeout: Duration,
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self {
            sms_activate_api_key: None,
            sms_activate_endpoint: None,
            five_sim_api_key: None,
            five_sim_endpoint: None,
            default_provider: ProviderKind::SmsActivate,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn non_blank_secret(value: String) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::from(value))
    }
}

impl GatewayConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sms-activate API key. A blank key leaves it unconfigured.
    pub fn sms_activate_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.sms_activate_api_key = non_blank_secret(api_key.into());
        self
    }

    /// Override the sms-activate handler URL.
    pub fn sms_activate_endpoint(mut self, endpoint: Url) -> Self {
        self.sms_activate_endpoint = Some(endpoint);
        self
    }

    /// Set the 5sim API token. A blank token leaves it unconfigured.
    pub fn five_sim_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.five_sim_api_key = non_blank_secret(api_key.into());
        self
    }

    /// Override the 5sim base URL.
    pub fn five_sim_endpoint(mut self, endpoint: Url) -> Self {
        self.five_sim_endpoint = Some(endpoint);
        self
    }

    /// Set the provider used when a request names none.
    ///
    /// Default: sms-activate
    pub fn default_provider(mut self, provider: ProviderKind) -> Self {
        self.default_provider = provider;
        self
    }

    /// Set the outbound request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the GatewayConfig.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let sms_activate_endpoint = match self.sms_activate_endpoint {
            Some(url) => url,
            None => parse_url(ENV_SMS_ACTIVATE_API_URL, SMS_ACTIVATE_API_URL)?,
        };
        let five_sim_endpoint = match self.five_sim_endpoint {
            Some(url) => url,
            None => parse_url(ENV_FIVE_SIM_API_URL, FIVE_SIM_API_URL)?,
        };

        Ok(GatewayConfig {
            sms_activate: ProviderSettings {
                endpoint: sms_activate_endpoint,
                api_key: self.sms_activate_api_key,
            },
            five_sim: ProviderSettings {
                endpoint: five_sim_endpoint,
                api_key: self.five_sim_api_key,
            },
            default_provider: self.default_provider,
            request_timeout: self.request_timeout,
        })
    }
}
