use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpTransport, QueryParams};
use crate::exchanges::binance::client::{decode, require_params, BinanceClient, CallOptions};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

pub const USER_DATA_STREAM_PATH: &str = "/api/v3/userDataStream";
pub const FUTURES_LISTEN_KEY_PATH: &str = "/fapi/v1/listenKey";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListenKey {
    listen_key: String,
}

impl<T: HttpTransport> BinanceClient<T> {
    #[instrument(skip(self, params))]
    pub async fn account_info(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.signed_request(Method::GET, "/api/v3/account", params, CallOptions::default())
            .await
    }

    #[instrument(skip(self, params))]
    pub async fn my_trades(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("myTrades", &params, &["symbol"])?;
        self.signed_request(
            Method::GET,
            "/api/v3/myTrades",
            params,
            CallOptions::default(),
        )
        .await
    }

    #[instrument(skip(self, params))]
    pub async fn margin_account_info(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::GET,
            "/sapi/v1/margin/account",
            params,
            CallOptions::default(),
        )
        .await
    }

    #[instrument(skip(self, params))]
    pub async fn futures_account_info(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::GET,
            "/fapi/v2/account",
            params,
            CallOptions::default(),
        )
        .await
    }

    pub async fn futures_account_balance(
        &self,
        params: QueryParams,
    ) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::GET,
            "/fapi/v2/balance",
            params,
            CallOptions::default(),
        )
        .await
    }

    pub async fn futures_position_risk(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::GET,
            "/fapi/v2/positionRisk",
            params,
            CallOptions::default(),
        )
        .await
    }

    /// Change initial leverage of a futures symbol
    #[instrument(skip(self, params))]
    pub async fn futures_leverage(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("futuresLeverage", &params, &["symbol", "leverage"])?;
        self.signed_request(
            Method::POST,
            "/fapi/v1/leverage",
            params,
            CallOptions::default(),
        )
        .await
    }

    /// Move funds between the spot and futures wallets.
    ///
    /// Served by the spot host even though the path names futures.
    #[instrument(skip(self, params))]
    pub async fn futures_transfer(&self, params: QueryParams) -> Result<Value, ExchangeError> {
        require_params("futuresTransfer", &params, &["asset", "amount", "type"])?;
        self.signed_request(
            Method::POST,
            "/sapi/v1/futures/transfer",
            params,
            CallOptions::default(),
        )
        .await
    }

    /// Open a spot user data stream and return its listenKey
    #[instrument(skip(self))]
    pub async fn get_data_stream(&self) -> Result<String, ExchangeError> {
        let value = self
            .signed_request(
                Method::POST,
                USER_DATA_STREAM_PATH,
                QueryParams::new(),
                CallOptions::without_query(),
            )
            .await?;
        let key: ListenKey = decode(value)?;
        Ok(key.listen_key)
    }

    /// Extend a spot user data stream by another 60 minutes
    #[instrument(skip(self, listen_key))]
    pub async fn keep_data_stream(&self, listen_key: &str) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::PUT,
            USER_DATA_STREAM_PATH,
            QueryParams::new().with("listenKey", listen_key),
            CallOptions::verbatim(),
        )
        .await
    }

    #[instrument(skip(self, listen_key))]
    pub async fn close_data_stream(&self, listen_key: &str) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::DELETE,
            USER_DATA_STREAM_PATH,
            QueryParams::new().with("listenKey", listen_key),
            CallOptions::verbatim(),
        )
        .await
    }

    /// Open a futures user data stream and return its listenKey
    #[instrument(skip(self))]
    pub async fn futures_get_data_stream(&self) -> Result<String, ExchangeError> {
        let value = self
            .signed_request(
                Method::POST,
                FUTURES_LISTEN_KEY_PATH,
                QueryParams::new(),
                CallOptions::without_query(),
            )
            .await?;
        let key: ListenKey = decode(value)?;
        Ok(key.listen_key)
    }

    /// Futures streams are identified by the key alone, so nothing is sent
    pub async fn futures_keep_data_stream(&self) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::PUT,
            FUTURES_LISTEN_KEY_PATH,
            QueryParams::new(),
            CallOptions::without_query(),
        )
        .await
    }

    pub async fn futures_close_data_stream(&self) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::DELETE,
            FUTURES_LISTEN_KEY_PATH,
            QueryParams::new(),
            CallOptions::without_query(),
        )
        .await
    }
}
