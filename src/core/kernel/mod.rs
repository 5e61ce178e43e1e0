/// Kernel - exchange-agnostic request pipeline pieces
///
/// The kernel holds everything that does not depend on Binance's endpoint
/// namespace: query encoding, signing, the clock capability, the HTTP
/// transport seam with response classification, and rate-limit telemetry.
///
/// # Architecture
///
/// ## Encoding and authentication
/// - `QueryParams` / `encode_query`: ordered parameters and their wire form
/// - `Signer` / `HmacSigner` / `sign_params`: HMAC-SHA256 request signing
/// - `Clock`: source of request timestamps
///
/// ## Transport
/// - `HttpTransport`: one request in, one raw response out
/// - `ReqwestTransport`: production transport
/// - `normalize_response`: JSON value or classified `ExchangeError`
///
/// ## Observability
/// - `RateLimitTelemetry`: latest-wins snapshot of rate-limit headers
///
/// # Example
/// ```rust
/// use binance_rest::core::kernel::{encode_query, sign_params, HmacSigner, QueryParams};
/// use secrecy::Secret;
///
/// # fn main() -> Result<(), binance_rest::ExchangeError> {
/// let signer = HmacSigner::new(Secret::new("secret".to_string()));
/// let params = QueryParams::new().with("symbol", "BTCUSDT").with("limit", 5);
/// let signed = sign_params(&signer, params, 1_700_000_000_000)?;
/// assert!(encode_query(&signed).starts_with("?symbol=BTCUSDT&limit=5&timestamp=1700000000000&signature="));
/// # Ok(())
/// # }
/// ```
pub mod clock;
pub mod codec;
pub mod rest;
pub mod signer;
pub mod telemetry;

// Re-export key types for convenience
pub use clock::{Clock, FnClock, SystemClock};
pub use codec::{encode_query, QueryParams};
pub use rest::{
    normalize_response, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    RestClientConfig,
};
pub use signer::{sign_params, HmacSigner, Signer};
pub use telemetry::{RateLimitMetrics, RateLimitSnapshot, RateLimitTelemetry};
