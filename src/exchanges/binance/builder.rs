use crate::core::config::ClientConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{Clock, HttpTransport, ReqwestTransport, RestClientConfig};
use crate::exchanges::binance::client::BinanceClient;
use secrecy::Secret;
use std::sync::Arc;

/// Builder for creating Binance clients
#[derive(Debug, Default)]
pub struct BinanceBuilder {
    config: ClientConfig,
    rest_config: RestClientConfig,
}

impl BinanceBuilder {
    /// Start from an anonymous configuration; only public endpoints will work
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            rest_config: RestClientConfig::default(),
        }
    }

    pub fn with_credentials(mut self, api_key: String, api_secret: String) -> Self {
        self.config.api_key = Some(Secret::new(api_key));
        self.config.api_secret = Some(Secret::new(api_secret));
        self
    }

    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.config = self.config.testnet(testnet);
        self
    }

    /// Override the spot host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.base_url(base_url.into());
        self
    }

    /// Override the futures host
    pub fn with_futures_base_url(mut self, futures_base_url: impl Into<String>) -> Self {
        self.config = self.config.futures_base_url(futures_base_url.into());
        self
    }

    /// Replace the clock used for request timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config = self.config.clock(clock);
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.rest_config = self.rest_config.with_timeout(timeout_seconds);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.rest_config = self.rest_config.with_user_agent(user_agent.into());
        self
    }

    /// Build a client on the reqwest transport
    pub fn build(self) -> Result<BinanceClient<ReqwestTransport>, ExchangeError> {
        BinanceClient::with_rest_config(self.config, &self.rest_config)
    }

    /// Build a client on a caller-supplied transport; transport settings are ignored
    pub fn build_with_transport<T: HttpTransport>(self, transport: T) -> BinanceClient<T> {
        BinanceClient::with_transport(self.config, transport)
    }
}

/// Convenience function to build a Binance client
pub fn build_client(config: ClientConfig) -> Result<BinanceClient<ReqwestTransport>, ExchangeError> {
    BinanceBuilder::from_config(config).build()
}
