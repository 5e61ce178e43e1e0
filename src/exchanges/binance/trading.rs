use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpTransport, QueryParams};
use crate::core::types::{NewOrderRespType, OrderType, TimeInForce};
use crate::exchanges::binance::client::{require_params, BinanceClient, CallOptions};
use crate::exchanges::binance::types::OrderResponse;
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

pub const ORDER_PATH: &str = "/api/v3/order";
pub const ORDER_TEST_PATH: &str = "/api/v3/order/test";
pub const ORDER_OCO_PATH: &str = "/api/v3/order/oco";
pub const MARGIN_ORDER_PATH: &str = "/sapi/v1/margin/order";
pub const FUTURES_ORDER_PATH: &str = "/fapi/v1/order";

fn parsed_type(params: &QueryParams) -> Option<OrderType> {
    params.get("type").and_then(|t| t.parse().ok())
}

/// Validate and default an order payload.
///
/// - LIMIT, STOP_LOSS_LIMIT, TAKE_PROFIT_LIMIT and untyped orders get
///   `timeInForce=GTC` unless it is already set.
/// - `symbol` and `side` are always required.
/// - `quantity` is required except for MARKET orders sized by `quoteOrderQty`
///   and for STOP_MARKET, TAKE_PROFIT_MARKET and TRAILING_STOP_MARKET.
/// - TRAILING_STOP_MARKET also requires `callbackRate`.
/// - A missing `type` becomes LIMIT.
///
/// The result lists `type` first and `timeInForce` second, followed by the
/// caller's parameters in their original order.
pub fn normalize_order(params: QueryParams) -> Result<QueryParams, ExchangeError> {
    let order_type = parsed_type(&params);
    let untyped = !params.contains("type");

    let mut normalized = QueryParams::new().with("type", OrderType::Limit);
    if untyped || order_type.is_some_and(OrderType::defaults_time_in_force) {
        normalized.insert("timeInForce", TimeInForce::GTC);
    }
    let normalized = normalized.merge(params);

    let mut required = vec!["symbol", "side"];
    let sized_by_quote =
        order_type == Some(OrderType::Market) && normalized.is_set("quoteOrderQty");
    if !sized_by_quote && !order_type.is_some_and(OrderType::is_conditional_market) {
        required.push("quantity");
    }
    if order_type == Some(OrderType::TrailingStopMarket) {
        required.push("callbackRate");
    }
    require_params("order", &normalized, &required)?;

    Ok(normalized)
}

/// Validate and default an OCO order payload.
///
/// `symbol`, `side`, `quantity`, `price` and `stopPrice` are required. When a
/// `stopLimitPrice` is given without `stopLimitTimeInForce`, GTC is appended.
pub fn normalize_oco_order(mut params: QueryParams) -> Result<QueryParams, ExchangeError> {
    require_params(
        "order",
        &params,
        &["symbol", "side", "quantity", "price", "stopPrice"],
    )?;

    if params.is_set("stopLimitPrice") {
        params.insert_if_absent("stopLimitTimeInForce", TimeInForce::GTC);
    }
    Ok(params)
}

/// Response shape the exchange will use for a normalized spot order
pub fn response_type_for(params: &QueryParams) -> Result<NewOrderRespType, ExchangeError> {
    match params.get("newOrderRespType") {
        Some(raw) => raw
            .parse()
            .map_err(|e| ExchangeError::InvalidParameters(format!("{}", e))),
        None => Ok(NewOrderRespType::default_for(parsed_type(params))),
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Place a spot order
    #[instrument(skip(self, params))]
    pub async fn order(&self, params: QueryParams) -> Result<OrderResponse, ExchangeError> {
        let params = normalize_order(params)?;
        let resp_type = response_type_for(&params)?;
        let value = self
            .signed_request(Method::POST, ORDER_PATH, params, CallOptions::default())
            .await?;
        OrderResponse::decode(resp_type, value)
    }

    /// Validate a spot order on the exchange without placing it
    #[instrument(skip(self, params))]
    pub async fn order_test(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        let params = normalize_order(params)?;
        self.signed_request(Method::POST, ORDER_TEST_PATH, params, CallOptions::default())
            .await
    }

    /// Place a spot OCO order pair
    #[instrument(skip(self, params))]
    pub async fn order_oco(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        let params = normalize_oco_order(params)?;
        self.signed_request(Method::POST, ORDER_OCO_PATH, params, CallOptions::default())
            .await
    }

    /// Place a cross or isolated margin order
    #[instrument(skip(self, params))]
    pub async fn margin_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        let params = normalize_order(params)?;
        self.signed_request(Method::POST, MARGIN_ORDER_PATH, params, CallOptions::default())
            .await
    }

    /// Place a USD-M futures order
    #[instrument(skip(self, params))]
    pub async fn futures_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        let params = normalize_order(params)?;
        self.signed_request(Method::POST, FUTURES_ORDER_PATH, params, CallOptions::default())
            .await
    }

    pub async fn cancel_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("cancelOrder", &params, &["symbol"])?;
        self.signed_request(Method::DELETE, ORDER_PATH, params, CallOptions::default())
            .await
    }

    pub async fn get_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("getOrder", &params, &["symbol"])?;
        self.signed_request(Method::GET, ORDER_PATH, params, CallOptions::default())
            .await
    }

    pub async fn open_orders(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::GET,
            "/api/v3/openOrders",
            params,
            CallOptions::default(),
        )
        .await
    }

    pub async fn all_orders(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("allOrders", &params, &["symbol"])?;
        self.signed_request(
            Method::GET,
            "/api/v3/allOrders",
            params,
            CallOptions::default(),
        )
        .await
    }

    pub async fn futures_cancel_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("futuresCancelOrder", &params, &["symbol"])?;
        self.signed_request(
            Method::DELETE,
            FUTURES_ORDER_PATH,
            params,
            CallOptions::default(),
        )
        .await
    }

    pub async fn futures_get_order(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("futuresGetOrder", &params, &["symbol"])?;
        self.signed_request(Method::GET, FUTURES_ORDER_PATH, params, CallOptions::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &QueryParams) -> Vec<&str> {
        params.keys().collect()
    }

    #[test]
    fn test_market_order_sized_by_quote_needs_no_quantity() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "BUY")
            .with("type", "MARKET")
            .with("quoteOrderQty", "100");
        let normalized = normalize_order(params).unwrap();
        assert_eq!(keys(&normalized), vec!["type", "symbol", "side", "quoteOrderQty"]);
        assert!(!normalized.contains("timeInForce"));
    }

    #[test]
    fn test_market_order_without_any_size_fails() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "BUY")
            .with("type", "MARKET");
        let err = normalize_order(params).unwrap_err();
        assert!(err.is_parameter_error());
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn test_untyped_order_defaults_to_gtc_limit() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "BUY")
            .with("quantity", 1)
            .with("price", "30000");
        let normalized = normalize_order(params).unwrap();
        assert_eq!(
            keys(&normalized),
            vec!["type", "timeInForce", "symbol", "side", "quantity", "price"]
        );
        assert_eq!(normalized.get("type"), Some("LIMIT"));
        assert_eq!(normalized.get("timeInForce"), Some("GTC"));
    }

    #[test]
    fn test_explicit_time_in_force_is_kept() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("type", "STOP_LOSS_LIMIT")
            .with("timeInForce", "IOC")
            .with("quantity", 1);
        let normalized = normalize_order(params).unwrap();
        assert_eq!(normalized.get("timeInForce"), Some("IOC"));
        assert_eq!(normalized.get("type"), Some("STOP_LOSS_LIMIT"));
        assert_eq!(keys(&normalized)[..2], ["type", "timeInForce"]);
    }

    #[test]
    fn test_conditional_market_orders_skip_quantity() {
        for order_type in ["STOP_MARKET", "TAKE_PROFIT_MARKET"] {
            let params = QueryParams::new()
                .with("symbol", "BTCUSDT")
                .with("side", "SELL")
                .with("type", order_type)
                .with("stopPrice", "25000")
                .with("closePosition", true);
            assert!(normalize_order(params).is_ok(), "{}", order_type);
        }
    }

    #[test]
    fn test_trailing_stop_requires_callback_rate() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("type", "TRAILING_STOP_MARKET");
        let err = normalize_order(params.clone()).unwrap_err();
        assert!(err.to_string().contains("callbackRate"));

        assert!(normalize_order(params.with("callbackRate", "1")).is_ok());
    }

    #[test]
    fn test_missing_symbol_is_reported_first() {
        let params = QueryParams::new().with("side", "BUY").with("quantity", 1);
        let err = normalize_order(params).unwrap_err();
        assert!(err.to_string().contains("requires symbol"));
    }

    #[test]
    fn test_oco_requires_all_legs() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("quantity", 1)
            .with("price", "32000");
        let err = normalize_oco_order(params).unwrap_err();
        assert!(err.to_string().contains("stopPrice"));
    }

    #[test]
    fn test_oco_appends_stop_limit_time_in_force() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("quantity", 1)
            .with("price", "32000")
            .with("stopPrice", "28000")
            .with("stopLimitPrice", "27900");
        let normalized = normalize_oco_order(params).unwrap();
        assert_eq!(keys(&normalized).last(), Some(&"stopLimitTimeInForce"));
        assert_eq!(normalized.get("stopLimitTimeInForce"), Some("GTC"));
    }

    #[test]
    fn test_oco_without_stop_limit_passes_through() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("quantity", 1)
            .with("price", "32000")
            .with("stopPrice", "28000");
        let normalized = normalize_oco_order(params.clone()).unwrap();
        assert_eq!(normalized, params);
    }

    #[test]
    fn test_response_type_resolution() {
        let explicit = QueryParams::new().with("newOrderRespType", "RESULT");
        assert_eq!(response_type_for(&explicit).unwrap(), NewOrderRespType::Result);

        let stop = QueryParams::new().with("type", "STOP_LOSS");
        assert_eq!(response_type_for(&stop).unwrap(), NewOrderRespType::Ack);

        let bogus = QueryParams::new().with("newOrderRespType", "VERBOSE");
        assert!(response_type_for(&bogus).unwrap_err().is_parameter_error());
    }
}
