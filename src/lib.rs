pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::ClientConfig,
    errors::ExchangeError,
    kernel::{QueryParams, RateLimitSnapshot},
    types::*,
};
pub use exchanges::binance::{BinanceBuilder, BinanceClient, CallOptions, OrderResponse};
