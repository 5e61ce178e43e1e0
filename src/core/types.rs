use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypesError {
    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Market segment; each has its own host and its own rate-limit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSegment {
    Spot,
    Futures,
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => f.write_str("spot"),
            Self::Futures => f.write_str("futures"),
        }
    }
}

/// Generates `as_str`, `Display` and `FromStr` for enums that map onto
/// the exchange's upper-case string constants.
macro_rules! exchange_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(TypesError::Unknown {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

exchange_enum!(OrderSide, "order side", {
    Buy => "BUY",
    Sell => "SELL",
});

/// Order types across spot, margin and futures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
    Stop,
    StopMarket,
    TakeProfitMarket,
    TrailingStopMarket,
}

exchange_enum!(OrderType, "order type", {
    Limit => "LIMIT",
    Market => "MARKET",
    StopLoss => "STOP_LOSS",
    StopLossLimit => "STOP_LOSS_LIMIT",
    TakeProfit => "TAKE_PROFIT",
    TakeProfitLimit => "TAKE_PROFIT_LIMIT",
    LimitMaker => "LIMIT_MAKER",
    Stop => "STOP",
    StopMarket => "STOP_MARKET",
    TakeProfitMarket => "TAKE_PROFIT_MARKET",
    TrailingStopMarket => "TRAILING_STOP_MARKET",
});

impl OrderType {
    /// Types that rest on the book and get `timeInForce=GTC` unless told otherwise
    pub fn defaults_time_in_force(self) -> bool {
        matches!(
            self,
            Self::Limit | Self::StopLossLimit | Self::TakeProfitLimit
        )
    }

    /// Futures conditional market orders that are sized by the position, not by `quantity`
    pub fn is_conditional_market(self) -> bool {
        matches!(
            self,
            Self::StopMarket | Self::TakeProfitMarket | Self::TrailingStopMarket
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC,
    IOC,
    FOK,
    GTX,
}

exchange_enum!(TimeInForce, "time in force", {
    GTC => "GTC",
    IOC => "IOC",
    FOK => "FOK",
    GTX => "GTX",
});

/// Requested level of detail for an order placement response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewOrderRespType {
    Ack,
    Result,
    Full,
}

exchange_enum!(NewOrderRespType, "order response type", {
    Ack => "ACK",
    Result => "RESULT",
    Full => "FULL",
});

impl NewOrderRespType {
    /// Spot default: MARKET and LIMIT orders answer with FULL, everything else with ACK
    pub fn default_for(order_type: Option<OrderType>) -> Self {
        match order_type {
            Some(OrderType::Market | OrderType::Limit) | None => Self::Full,
            Some(_) => Self::Ack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1s")]
    Seconds1,
    #[serde(rename = "1m")]
    Minutes1,
    #[serde(rename = "3m")]
    Minutes3,
    #[serde(rename = "5m")]
    Minutes5,
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "1h")]
    Hours1,
    #[serde(rename = "2h")]
    Hours2,
    #[serde(rename = "4h")]
    Hours4,
    #[serde(rename = "6h")]
    Hours6,
    #[serde(rename = "8h")]
    Hours8,
    #[serde(rename = "12h")]
    Hours12,
    #[serde(rename = "1d")]
    Days1,
    #[serde(rename = "3d")]
    Days3,
    #[serde(rename = "1w")]
    Weeks1,
    #[serde(rename = "1M")]
    Months1,
}

exchange_enum!(KlineInterval, "kline interval", {
    Seconds1 => "1s",
    Minutes1 => "1m",
    Minutes3 => "3m",
    Minutes5 => "5m",
    Minutes15 => "15m",
    Minutes30 => "30m",
    Hours1 => "1h",
    Hours2 => "2h",
    Hours4 => "4h",
    Hours6 => "6h",
    Hours8 => "8h",
    Hours12 => "12h",
    Days1 => "1d",
    Days3 => "3d",
    Weeks1 => "1w",
    Months1 => "1M",
});
