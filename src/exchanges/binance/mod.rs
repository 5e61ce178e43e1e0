pub mod account;
pub mod builder;
pub mod client;
pub mod codec;
pub mod market_data;
pub mod routing;
pub mod trading;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_client, BinanceBuilder};
pub use client::{BinanceClient, CallOptions, API_KEY_HEADER};
pub use routing::{segment_for_path, BinanceHosts};
pub use trading::{normalize_oco_order, normalize_order};
pub use types::{
    AggTrade, Candle, LeveragedTokenKline, OrderAck, OrderFill, OrderFull, OrderResponse,
    OrderResult, PriceKline, ServerTime,
};
