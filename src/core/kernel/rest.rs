use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{instrument, trace, warn};

/// A fully assembled outgoing request
///
/// Parameters are already encoded into `url`; requests never carry a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as received from the transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    /// Final URL of the response
    pub url: String,
    /// Header names are stored lowercase
    pub headers: HashMap<String, String>,
    pub body: String,
    /// Set when the head arrived but reading the body failed
    pub body_error: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Transport seam for the dispatcher
///
/// `ReqwestTransport` is the production implementation; tests inject their own.
/// A returned `Err` means no response was received at all. A failure while
/// reading the body is reported through `HttpResponse::body_error` so the
/// headers still reach telemetry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError>;
}

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Request timeout in seconds; `None` leaves requests unbounded
    pub timeout_seconds: Option<u64>,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: "binance-rest/0.1".to_string(),
        }
    }
}

impl RestClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// `HttpTransport` backed by reqwest
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &RestClientConfig) -> Result<Self, ExchangeError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let (body, body_error) = match response.text().await {
            Ok(body) => (body, None),
            Err(e) => {
                warn!(status = status.as_u16(), url = %url, "Failed to read response body: {}", e);
                (String::new(), Some(e.to_string()))
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            url,
            headers,
            body,
            body_error,
        })
    }
}

/// Turn a received response into a JSON value or a classified error.
///
/// Success statuses return the parsed body as-is. Failure statuses with a JSON
/// body become `ApiError`; anything else becomes `TransportError` carrying the
/// raw text, which is what a proxy or load balancer in front of the exchange
/// tends to send. A body that could not be read is `BodyReadError` whatever
/// the status.
pub fn normalize_response(response: &HttpResponse) -> Result<Value, ExchangeError> {
    if let Some(message) = &response.body_error {
        return Err(ExchangeError::BodyReadError {
            status: response.status,
            url: response.url.clone(),
            message: message.clone(),
        });
    }

    trace!("Response body: {}", response.body);

    if response.is_success() {
        return serde_json::from_str(&response.body).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
        });
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(json) => {
            let code = json
                .get("code")
                .and_then(Value::as_i64)
                .unwrap_or_else(|| i64::from(response.status));
            let message = json
                .get("msg")
                .and_then(Value::as_str)
                .map_or_else(
                    || format!("{} {}", response.status, response.status_text),
                    str::to_string,
                );
            warn!(code, url = %response.url, "Exchange rejected request: {}", message);
            Err(ExchangeError::ApiError {
                code,
                message,
                url: response.url.clone(),
            })
        }
        Err(_) => {
            warn!(status = response.status, url = %response.url, "Non-JSON failure response");
            Err(ExchangeError::TransportError {
                status: response.status,
                status_text: response.status_text.clone(),
                body: response.body.clone(),
            })
        }
    }
}
