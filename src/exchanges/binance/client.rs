use crate::core::config::ClientConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    encode_query, normalize_response, sign_params, Clock, HmacSigner, HttpRequest, HttpTransport,
    QueryParams, RateLimitSnapshot, RateLimitTelemetry, ReqwestTransport, RestClientConfig,
    Signer,
};
use crate::exchanges::binance::routing::BinanceHosts;
use crate::exchanges::binance::types::ServerTime;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";
pub const SERVER_TIME_PATH: &str = "/api/v3/time";
/// Parameter flag asking the signed path to use the exchange clock
pub const USE_SERVER_TIME_PARAM: &str = "useServerTime";

/// Shape of a signed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Send parameters in the URL. When false the request carries no query at all.
    pub include_query_in_url: bool,
    /// Add `timestamp` and `signature`. When false the caller's parameters are sent verbatim.
    pub inject_timestamp_and_signature: bool,
    /// Fetch the exchange time before signing instead of asking the configured clock
    pub use_server_time: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            include_query_in_url: true,
            inject_timestamp_and_signature: true,
            use_server_time: false,
        }
    }
}

impl CallOptions {
    /// Signed endpoint that takes no parameters in the URL
    pub fn without_query() -> Self {
        Self {
            include_query_in_url: false,
            ..Self::default()
        }
    }

    /// Forward the caller's parameters untouched, e.g. a server-issued listenKey
    pub fn verbatim() -> Self {
        Self {
            inject_timestamp_and_signature: false,
            ..Self::default()
        }
    }

    pub fn with_server_time(mut self) -> Self {
        self.use_server_time = true;
        self
    }
}

/// Binance REST client
///
/// Owns its configuration, transport and rate-limit telemetry; separate
/// clients share nothing. Every call is sequential internally and no call is
/// retried.
pub struct BinanceClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    hosts: BinanceHosts,
    api_key: Option<Secret<String>>,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<dyn Clock>,
    rate_limits: RateLimitTelemetry,
}

impl<T: HttpTransport> std::fmt::Debug for BinanceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("hosts", &self.hosts)
            .field("has_api_key", &self.api_key.is_some())
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl BinanceClient<ReqwestTransport> {
    /// Create a client backed by reqwest with default transport settings
    pub fn new(config: ClientConfig) -> Result<Self, ExchangeError> {
        Self::with_rest_config(config, &RestClientConfig::default())
    }

    pub fn with_rest_config(
        config: ClientConfig,
        rest_config: &RestClientConfig,
    ) -> Result<Self, ExchangeError> {
        let transport = ReqwestTransport::new(rest_config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Create a client on top of any transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let hosts = BinanceHosts::from_config(&config);
        let non_empty = |s: &Secret<String>| !s.expose_secret().is_empty();
        let signer = config
            .api_secret
            .filter(non_empty)
            .map(|secret| Arc::new(HmacSigner::new(secret)) as Arc<dyn Signer>);

        Self {
            transport,
            hosts,
            api_key: config.api_key.filter(non_empty),
            signer,
            clock: config.clock,
            rate_limits: RateLimitTelemetry::new(),
        }
    }

    pub fn hosts(&self) -> &BinanceHosts {
        &self.hosts
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether signed endpoints can be called
    pub fn can_sign(&self) -> bool {
        self.api_key.is_some() && self.signer.is_some()
    }

    /// Latest rate-limit headers seen per market segment
    pub fn rate_limits(&self) -> RateLimitSnapshot {
        self.rate_limits.snapshot()
    }

    /// Unauthenticated call
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn public_request(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
    ) -> Result<Value, ExchangeError> {
        self.dispatch(method, path, &encode_query(&params), None)
            .await
    }

    /// Call that needs the API key header but no signature
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn key_request(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
    ) -> Result<Value, ExchangeError> {
        let api_key = self.require_api_key()?;
        self.dispatch(method, path, &encode_query(&params), Some(api_key))
            .await
    }

    /// Signed call
    ///
    /// The `useServerTime` parameter flag is always removed from `params`; when
    /// it is truthy, or `options.use_server_time` is set, one server-time request
    /// is made before signing. A timestamp is only resolved when one is actually
    /// sent, so calls with `include_query_in_url` or
    /// `inject_timestamp_and_signature` off never request the server time.
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn signed_request(
        &self,
        method: Method,
        path: &str,
        mut params: QueryParams,
        options: CallOptions,
    ) -> Result<Value, ExchangeError> {
        let api_key = self.require_api_key()?;
        let signer = self.require_signer()?;

        let use_server_time = options.use_server_time
            || params
                .remove(USE_SERVER_TIME_PARAM)
                .is_some_and(|flag| is_truthy(&flag));

        let query = if !options.include_query_in_url {
            String::new()
        } else if options.inject_timestamp_and_signature {
            let timestamp = self.resolve_timestamp(use_server_time).await?;
            encode_query(&sign_params(signer.as_ref(), params, timestamp)?)
        } else {
            encode_query(&params)
        };

        self.dispatch(method, path, &query, Some(api_key)).await
    }

    /// Exchange time in milliseconds
    pub async fn server_time(&self) -> Result<u64, ExchangeError> {
        let value = self
            .public_request(Method::GET, SERVER_TIME_PATH, QueryParams::new())
            .await?;
        let time: ServerTime = decode(value)?;
        Ok(time.server_time)
    }

    async fn resolve_timestamp(&self, use_server_time: bool) -> Result<u64, ExchangeError> {
        if use_server_time {
            self.server_time().await
        } else {
            self.clock.now_millis().await
        }
    }

    fn require_api_key(&self) -> Result<&str, ExchangeError> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .ok_or_else(|| {
                ExchangeError::InvalidParameters(
                    "An API key is required for this endpoint".to_string(),
                )
            })
    }

    fn require_signer(&self) -> Result<&Arc<dyn Signer>, ExchangeError> {
        self.signer.as_ref().ok_or_else(|| {
            ExchangeError::InvalidParameters(
                "An API key and secret are required for authenticated calls".to_string(),
            )
        })
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Value, ExchangeError> {
        let (segment, host) = self.hosts.route(path);
        let mut request = HttpRequest::new(method, format!("{}{}{}", host, path, query));
        if let Some(api_key) = api_key {
            request = request.with_header(API_KEY_HEADER, api_key);
        }

        debug!(%segment, path, "Dispatching request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "Received response");

        self.rate_limits.observe(segment, &response);
        normalize_response(&response)
    }
}

fn is_truthy(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true") || flag == "1"
}

/// Decode a normalized JSON value into a typed response
pub(crate) fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ExchangeError> {
    serde_json::from_value(value).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
    })
}

/// Fail with `InvalidParameters` unless every field in `required` is set
///
/// A field present with an empty value counts as missing. Any non-empty value
/// passes, including `0` and `false`.
pub(crate) fn require_params(
    method: &str,
    params: &QueryParams,
    required: &[&str],
) -> Result<(), ExchangeError> {
    match required.iter().find(|field| !params.is_set(field)) {
        Some(field) => Err(ExchangeError::InvalidParameters(format!(
            "Method {} requires {} parameter.",
            method, field
        ))),
        None => Ok(()),
    }
}
