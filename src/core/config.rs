use crate::core::kernel::clock::{Clock, SystemClock};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::sync::Arc;

pub const SPOT_BASE_URL: &str = "https://api.binance.com";
pub const FUTURES_BASE_URL: &str = "https://fapi.binance.com";
pub const SPOT_TESTNET_BASE_URL: &str = "https://testnet.binance.vision";
pub const FUTURES_TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Client configuration; fixed for the lifetime of a client
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: Option<Secret<String>>,
    pub api_secret: Option<Secret<String>>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub futures_base_url: Option<String>,
    pub clock: Arc<dyn Clock>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            testnet: false,
            base_url: None,
            futures_base_url: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("has_api_key", &self.api_key.is_some())
            .field("has_api_secret", &self.api_secret.is_some())
            .field("testnet", &self.testnet)
            .field("spot_host", &self.spot_host())
            .field("futures_host", &self.futures_host())
            .finish_non_exhaustive()
    }
}

// Secrets are never serialized
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let redacted = |secret: &Option<Secret<String>>| secret.as_ref().map(|_| "[REDACTED]");
        let mut state = serializer.serialize_struct("ClientConfig", 5)?;
        state.serialize_field("api_key", &redacted(&self.api_key))?;
        state.serialize_field("api_secret", &redacted(&self.api_secret))?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("futures_base_url", &self.futures_base_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            api_key: Option<String>,
            api_secret: Option<String>,
            #[serde(default)]
            testnet: bool,
            base_url: Option<String>,
            futures_base_url: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: helper.api_key.map(Secret::new),
            api_secret: helper.api_secret.map(Secret::new),
            testnet: helper.testnet,
            base_url: helper.base_url,
            futures_base_url: helper.futures_base_url,
            clock: Arc::new(SystemClock),
        })
    }
}

impl ClientConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key: Some(Secret::new(api_key)),
            api_secret: Some(Secret::new(api_secret)),
            ..Self::default()
        }
    }

    /// Configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    ///
    /// Recognised variables (all optional):
    /// - `{PREFIX}_API_KEY`, `{PREFIX}_SECRET_KEY`
    /// - `{PREFIX}_TESTNET` (defaults to false)
    /// - `{PREFIX}_BASE_URL`, `{PREFIX}_FUTURES_BASE_URL`
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let var = |name: &str| {
            env::var(format!("{}_{}", prefix, name))
                .ok()
                .filter(|v| !v.is_empty())
        };

        let testnet = match var("TESTNET") {
            Some(raw) => raw.parse::<bool>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{}_TESTNET must be true or false, got '{}'",
                    prefix, raw
                ))
            })?,
            None => false,
        };

        Ok(Self {
            api_key: var("API_KEY").map(Secret::new),
            api_secret: var("SECRET_KEY").map(Secret::new),
            testnet,
            base_url: var("BASE_URL"),
            futures_base_url: var("FUTURES_BASE_URL"),
            clock: Arc::new(SystemClock),
        })
    }

    /// Create configuration from a `.env` file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific `.env` file path.
    /// A missing file is not an error; system variables are used instead.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Set testnet mode
    #[must_use]
    pub fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Override the spot host
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Override the futures host
    #[must_use]
    pub fn futures_base_url(mut self, futures_base_url: String) -> Self {
        self.futures_base_url = Some(futures_base_url);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolved spot host
    pub fn spot_host(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            if self.testnet {
                SPOT_TESTNET_BASE_URL.to_string()
            } else {
                SPOT_BASE_URL.to_string()
            }
        })
    }

    /// Resolved futures host
    pub fn futures_host(&self) -> String {
        self.futures_base_url.clone().unwrap_or_else(|| {
            if self.testnet {
                FUTURES_TESTNET_BASE_URL.to_string()
            } else {
                FUTURES_BASE_URL.to_string()
            }
        })
    }

    /// Whether key-only endpoints can be called
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Whether signed endpoints can be called
    pub fn has_credentials(&self) -> bool {
        self.has_api_key()
            && self
                .api_secret
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
