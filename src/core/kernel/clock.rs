use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use chrono::Utc;

/// Source of request timestamps (milliseconds since the Unix epoch)
///
/// The signed call path awaits the clock before signing, so implementations
/// may be synchronous or perform their own I/O.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn now_millis(&self) -> Result<u64, ExchangeError>;
}

/// Wall clock of the local machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn now_millis(&self) -> Result<u64, ExchangeError> {
        u64::try_from(Utc::now().timestamp_millis()).map_err(|e| {
            ExchangeError::Other(format!("System time error: {}", e))
        })
    }
}

/// Adapter for a plain synchronous closure
pub struct FnClock<F>(pub F);

#[async_trait]
impl<F> Clock for FnClock<F>
where
    F: Fn() -> u64 + Send + Sync,
{
    async fn now_millis(&self) -> Result<u64, ExchangeError> {
        Ok((self.0)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_clock_returns_closure_value() {
        let clock = FnClock(|| 1_700_000_000_000);
        assert_eq!(clock.now_millis().await.unwrap(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_system_clock_is_after_2020() {
        let now = SystemClock.now_millis().await.unwrap();
        assert!(now > 1_577_836_800_000);
    }
}
