use crate::core::errors::ExchangeError;
use crate::core::types::{NewOrderRespType, OrderSide, OrderType, TimeInForce};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: u64,
}

// Records mapped from positional arrays, see `codec`

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub open_time: u64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: u64,
    pub quote_volume: Decimal,
    pub trades: u64,
    pub base_asset_volume: Decimal,
    pub quote_asset_volume: Decimal,
}

/// Index- and mark-price klines carry no volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceKline {
    pub open_time: u64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub close_time: u64,
}

/// Historical NAV kline of a leveraged token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeveragedTokenKline {
    pub open_time: u64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub real_leverage: Decimal,
    pub close_time: u64,
    pub nav_updates: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggTrade {
    pub agg_id: u64,
    /// Taken from the request; the exchange does not echo it
    #[serde(default)]
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub first_id: u64,
    pub last_id: u64,
    pub timestamp: u64,
    pub is_buyer_maker: bool,
    /// Spot only
    #[serde(default)]
    pub was_best_price: Option<bool>,
}

// Order placement responses

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: u64,
    #[serde(default = "no_order_list")]
    pub order_list_id: i64,
    pub client_order_id: String,
    pub transact_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    #[serde(flatten)]
    pub ack: OrderAck,
    pub price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub cummulative_quote_qty: Decimal,
    pub status: String,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFill {
    pub price: Decimal,
    pub qty: Decimal,
    pub commission: Decimal,
    pub commission_asset: String,
    #[serde(default)]
    pub trade_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderFull {
    #[serde(flatten)]
    pub result: OrderResult,
    pub fills: Vec<OrderFill>,
}

/// Order placement response; the shape depends on `newOrderRespType`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderResponse {
    Ack(OrderAck),
    Result(OrderResult),
    Full(OrderFull),
}

impl OrderResponse {
    /// Decode a placement response of the requested shape.
    ///
    /// The order has already been placed when this runs, so a body that does
    /// not fit is reported as a `DeserializationError` carrying the raw JSON
    /// rather than as a failed order.
    pub fn decode(resp_type: NewOrderRespType, value: Value) -> Result<Self, ExchangeError> {
        let decoded = match resp_type {
            NewOrderRespType::Ack => OrderAck::deserialize(&value).map(Self::Ack),
            NewOrderRespType::Result => OrderResult::deserialize(&value).map(Self::Result),
            NewOrderRespType::Full => OrderFull::deserialize(&value).map(Self::Full),
        };
        decoded.map_err(|e| {
            ExchangeError::DeserializationError(format!(
                "Order accepted by the exchange but its {} response could not be decoded: {}; raw response: {}",
                resp_type, e, value
            ))
        })
    }

    pub fn resp_type(&self) -> NewOrderRespType {
        match self {
            Self::Ack(_) => NewOrderRespType::Ack,
            Self::Result(_) => NewOrderRespType::Result,
            Self::Full(_) => NewOrderRespType::Full,
        }
    }

    pub fn ack(&self) -> &OrderAck {
        match self {
            Self::Ack(ack) => ack,
            Self::Result(result) => &result.ack,
            Self::Full(full) => &full.result.ack,
        }
    }
}

const fn no_order_list() -> i64 {
    -1
}
