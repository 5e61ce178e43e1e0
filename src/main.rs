use anyhow::Context;
use binance_rest::{BinanceBuilder, ClientConfig, KlineInterval, QueryParams};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Public endpoints work without credentials; BINANCE_API_KEY and
    // BINANCE_SECRET_KEY enable the account section below.
    let config = ClientConfig::from_env("BINANCE").context("reading BINANCE_* environment")?;
    let can_sign = config.has_credentials();
    let client = BinanceBuilder::from_config(config)
        .with_timeout(10)
        .build()?;

    let server_time = client.time().await?;
    println!("Server time: {}", server_time);

    let candles = client
        .candles(
            QueryParams::new()
                .with("symbol", "BTCUSDT")
                .with("interval", KlineInterval::Minutes1)
                .with("limit", 5),
        )
        .await?;
    for candle in &candles {
        println!(
            "{} open={} high={} low={} close={} volume={}",
            candle.open_time, candle.open, candle.high, candle.low, candle.close, candle.volume
        );
    }

    if can_sign {
        let account = client
            .account_info(QueryParams::new().with("useServerTime", true))
            .await?;
        println!(
            "Account can trade: {}",
            account.get("canTrade").unwrap_or(&serde_json::Value::Null)
        );
    }

    let rate_limits = client.rate_limits();
    println!("Rate limits: {}", serde_json::to_string_pretty(&rate_limits)?);

    Ok(())
}
