use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpTransport, QueryParams};
use crate::core::types::KlineInterval;
use crate::exchanges::binance::client::{decode, require_params, BinanceClient};
use crate::exchanges::binance::codec::{
    decode_rows, Record, RowLayout, AGG_TRADE, CANDLE, LEVERAGED_TOKEN_KLINE, PRICE_KLINE,
};
use crate::exchanges::binance::types::{
    AggTrade, Candle, LeveragedTokenKline, PriceKline, ServerTime,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// Interval used when a kline request does not name one
pub const DEFAULT_INTERVAL: KlineInterval = KlineInterval::Minutes5;

/// Map each row through `layout`, then into the typed record
fn decode_records<R: DeserializeOwned>(
    layout: &impl RowLayout,
    value: Value,
) -> Result<Vec<R>, ExchangeError> {
    decode_rows(layout, value)?
        .into_iter()
        .map(|record| decode(Value::Object(record)))
        .collect()
}

/// Aggregate trades do not echo the symbol, so it is copied from the request
fn decode_agg_trades(symbol: &str, value: Value) -> Result<Vec<AggTrade>, ExchangeError> {
    decode_rows(&AGG_TRADE, value)?
        .into_iter()
        .map(|mut record: Record| {
            record.insert("symbol".to_string(), Value::String(symbol.to_string()));
            decode(Value::Object(record))
        })
        .collect()
}

fn with_default_interval(mut params: QueryParams) -> QueryParams {
    params.insert_if_absent("interval", DEFAULT_INTERVAL);
    params
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Connectivity check; resolves to `true` when the exchange answers
    pub async fn ping(&self) -> Result<bool, ExchangeError> {
        self.public_request(Method::GET, "/api/v3/ping", QueryParams::new())
            .await?;
        Ok(true)
    }

    /// Exchange time in milliseconds
    pub async fn time(&self) -> Result<u64, ExchangeError> {
        self.server_time().await
    }

    pub async fn exchange_info(&self) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/api/v3/exchangeInfo", QueryParams::new())
            .await
    }

    /// Order book depth
    #[instrument(skip(self, params))]
    pub async fn book(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("book", &params, &["symbol"])?;
        self.public_request(Method::GET, "/api/v3/depth", params)
            .await
    }

    /// Recent trades
    #[instrument(skip(self, params))]
    pub async fn trades(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("trades", &params, &["symbol"])?;
        self.public_request(Method::GET, "/api/v3/trades", params)
            .await
    }

    /// Compressed aggregate trades
    #[instrument(skip(self, params))]
    pub async fn agg_trades(&self, params: QueryParams) -> Result<Vec<AggTrade>, ExchangeError> {
        require_params("aggTrades", &params, &["symbol"])?;
        let symbol = params.get("symbol").unwrap_or_default().to_string();
        let value = self
            .public_request(Method::GET, "/api/v3/aggTrades", params)
            .await?;
        decode_agg_trades(&symbol, value)
    }

    /// Spot klines; `interval` defaults to 5m
    #[instrument(skip(self, params))]
    pub async fn candles(&self, params: QueryParams) -> Result<Vec<Candle>, ExchangeError> {
        require_params("candles", &params, &["symbol"])?;
        let value = self
            .public_request(Method::GET, "/api/v3/klines", with_default_interval(params))
            .await?;
        decode_records(&CANDLE, value)
    }

    pub async fn avg_price(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("avgPrice", &params, &["symbol"])?;
        self.public_request(Method::GET, "/api/v3/avgPrice", params)
            .await
    }

    /// 24 hour rolling statistics, for one symbol or all of them
    pub async fn daily_stats(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/api/v3/ticker/24hr", params)
            .await
    }

    /// Latest price per symbol
    pub async fn prices(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/api/v3/ticker/price", params)
            .await
    }

    pub async fn futures_ping(&self) -> Result<bool, ExchangeError> {
        self.public_request(Method::GET, "/fapi/v1/ping", QueryParams::new())
            .await?;
        Ok(true)
    }

    /// Futures exchange time in milliseconds
    pub async fn futures_time(&self) -> Result<u64, ExchangeError> {
        let value = self
            .public_request(Method::GET, "/fapi/v1/time", QueryParams::new())
            .await?;
        let time: ServerTime = decode(value)?;
        Ok(time.server_time)
    }

    pub async fn futures_exchange_info(&self) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/fapi/v1/exchangeInfo", QueryParams::new())
            .await
    }

    #[instrument(skip(self, params))]
    pub async fn futures_book(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("futuresBook", &params, &["symbol"])?;
        self.public_request(Method::GET, "/fapi/v1/depth", params)
            .await
    }

    #[instrument(skip(self, params))]
    pub async fn futures_agg_trades(
        &self,
        params: QueryParams,
    ) -> Result<Vec<AggTrade>, ExchangeError> {
        require_params("futuresAggTrades", &params, &["symbol"])?;
        let symbol = params.get("symbol").unwrap_or_default().to_string();
        let value = self
            .public_request(Method::GET, "/fapi/v1/aggTrades", params)
            .await?;
        decode_agg_trades(&symbol, value)
    }

    #[instrument(skip(self, params))]
    pub async fn futures_candles(&self, params: QueryParams) -> Result<Vec<Candle>, ExchangeError> {
        require_params("futuresCandles", &params, &["symbol"])?;
        let value = self
            .public_request(Method::GET, "/fapi/v1/klines", with_default_interval(params))
            .await?;
        decode_records(&CANDLE, value)
    }

    /// Klines of a perpetual or delivery contract series
    #[instrument(skip(self, params))]
    pub async fn futures_continuous_candles(
        &self,
        params: QueryParams,
    ) -> Result<Vec<Candle>, ExchangeError> {
        require_params("futuresContinuousCandles", &params, &["pair", "contractType"])?;
        let value = self
            .public_request(
                Method::GET,
                "/fapi/v1/continuousKlines",
                with_default_interval(params),
            )
            .await?;
        decode_records(&CANDLE, value)
    }

    #[instrument(skip(self, params))]
    pub async fn futures_index_price_candles(
        &self,
        params: QueryParams,
    ) -> Result<Vec<PriceKline>, ExchangeError> {
        require_params("futuresIndexPriceCandles", &params, &["pair"])?;
        let value = self
            .public_request(
                Method::GET,
                "/fapi/v1/indexPriceKlines",
                with_default_interval(params),
            )
            .await?;
        decode_records(&PRICE_KLINE, value)
    }

    #[instrument(skip(self, params))]
    pub async fn futures_mark_price_candles(
        &self,
        params: QueryParams,
    ) -> Result<Vec<PriceKline>, ExchangeError> {
        require_params("futuresMarkPriceCandles", &params, &["symbol"])?;
        let value = self
            .public_request(
                Method::GET,
                "/fapi/v1/markPriceKlines",
                with_default_interval(params),
            )
            .await?;
        decode_records(&PRICE_KLINE, value)
    }

    /// Historical NAV klines of a leveraged token
    #[instrument(skip(self, params))]
    pub async fn futures_leveraged_token_candles(
        &self,
        params: QueryParams,
    ) -> Result<Vec<LeveragedTokenKline>, ExchangeError> {
        require_params("futuresLeveragedTokenCandles", &params, &["symbol"])?;
        let value = self
            .public_request(Method::GET, "/fapi/v1/lvtKlines", with_default_interval(params))
            .await?;
        decode_records(&LEVERAGED_TOKEN_KLINE, value)
    }

    /// Mark price and funding info
    pub async fn futures_mark_price(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/fapi/v1/premiumIndex", params)
            .await
    }

    pub async fn futures_funding_rate(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.public_request(Method::GET, "/fapi/v1/fundingRate", params)
            .await
    }
}
