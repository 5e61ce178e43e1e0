use crate::core::kernel::rest::HttpResponse;
use crate::core::types::MarketSegment;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tracing::trace;

/// Last observed rate-limit headers for one market segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_weight_1m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count_10s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count_1m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count_1h: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count_1d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
}

impl RateLimitMetrics {
    fn slot_mut(&mut self, metric: Metric) -> &mut Option<String> {
        match metric {
            Metric::UsedWeight1m => &mut self.used_weight_1m,
            Metric::OrderCount10s => &mut self.order_count_10s,
            Metric::OrderCount1m => &mut self.order_count_1m,
            Metric::OrderCount1h => &mut self.order_count_1h,
            Metric::OrderCount1d => &mut self.order_count_1d,
            Metric::ResponseTime => &mut self.response_time,
        }
    }
}

/// Rate-limit metrics per market segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    pub spot: RateLimitMetrics,
    pub futures: RateLimitMetrics,
}

impl RateLimitSnapshot {
    pub fn segment(&self, segment: MarketSegment) -> &RateLimitMetrics {
        match segment {
            MarketSegment::Spot => &self.spot,
            MarketSegment::Futures => &self.futures,
        }
    }

    fn segment_mut(&mut self, segment: MarketSegment) -> &mut RateLimitMetrics {
        match segment {
            MarketSegment::Spot => &mut self.spot,
            MarketSegment::Futures => &mut self.futures,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    UsedWeight1m,
    OrderCount10s,
    OrderCount1m,
    OrderCount1h,
    OrderCount1d,
    ResponseTime,
}

const RATE_LIMIT_HEADERS: [(&str, Metric); 6] = [
    ("x-mbx-used-weight-1m", Metric::UsedWeight1m),
    ("x-mbx-order-count-10s", Metric::OrderCount10s),
    ("x-mbx-order-count-1m", Metric::OrderCount1m),
    ("x-mbx-order-count-1h", Metric::OrderCount1h),
    ("x-mbx-order-count-1d", Metric::OrderCount1d),
    ("x-response-time", Metric::ResponseTime),
];

/// Latest-wins store of rate-limit headers, owned by one client
///
/// Concurrent calls may race on writes; the values are informational and
/// never gate a request.
#[derive(Debug, Default)]
pub struct RateLimitTelemetry {
    snapshot: RwLock<RateLimitSnapshot>,
}

impl RateLimitTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every recognised header of `response` under `segment`.
    /// Metrics whose header is absent keep their previous value.
    pub fn observe(&self, segment: MarketSegment, response: &HttpResponse) {
        let observed: Vec<_> = RATE_LIMIT_HEADERS
            .iter()
            .filter_map(|(header, metric)| response.header(header).map(|v| (*metric, v)))
            .collect();
        if observed.is_empty() {
            return;
        }

        let mut snapshot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let metrics = snapshot.segment_mut(segment);
        for (metric, value) in observed {
            trace!(?segment, ?metric, value, "Rate limit header");
            *metrics.slot_mut(metric) = Some(value.to_string());
        }
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> RateLimitSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            url: String::new(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<HashMap<_, _>>(),
            body: "{}".to_string(),
            body_error: None,
        }
    }

    #[test]
    fn test_observe_maps_all_headers() {
        let telemetry = RateLimitTelemetry::new();
        telemetry.observe(
            MarketSegment::Spot,
            &response_with(&[
                ("x-mbx-used-weight-1m", "50"),
                ("x-mbx-order-count-10s", "1"),
                ("x-mbx-order-count-1m", "2"),
                ("x-mbx-order-count-1h", "3"),
                ("x-mbx-order-count-1d", "4"),
                ("x-response-time", "7ms"),
                ("content-type", "application/json"),
            ]),
        );

        let snapshot = telemetry.snapshot();
        assert_eq!(
            snapshot.spot,
            RateLimitMetrics {
                used_weight_1m: Some("50".to_string()),
                order_count_10s: Some("1".to_string()),
                order_count_1m: Some("2".to_string()),
                order_count_1h: Some("3".to_string()),
                order_count_1d: Some("4".to_string()),
                response_time: Some("7ms".to_string()),
            }
        );
        assert_eq!(snapshot.futures, RateLimitMetrics::default());
    }

    #[test]
    fn test_segments_are_independent() {
        let telemetry = RateLimitTelemetry::new();
        telemetry.observe(
            MarketSegment::Spot,
            &response_with(&[("x-mbx-used-weight-1m", "50")]),
        );
        telemetry.observe(MarketSegment::Futures, &response_with(&[]));

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.spot.used_weight_1m.as_deref(), Some("50"));
        assert_eq!(snapshot.futures.used_weight_1m, None);
    }

    #[test]
    fn test_last_write_wins_and_absent_headers_keep_values() {
        let telemetry = RateLimitTelemetry::new();
        telemetry.observe(
            MarketSegment::Futures,
            &response_with(&[("x-mbx-used-weight-1m", "10"), ("x-mbx-order-count-1m", "1")]),
        );
        telemetry.observe(
            MarketSegment::Futures,
            &response_with(&[("x-mbx-used-weight-1m", "3")]),
        );

        let futures = telemetry.snapshot().futures;
        assert_eq!(futures.used_weight_1m.as_deref(), Some("3"));
        assert_eq!(futures.order_count_1m.as_deref(), Some("1"));
    }

    #[test]
    fn test_snapshot_serializes_like_the_accessor_contract() {
        let telemetry = RateLimitTelemetry::new();
        telemetry.observe(
            MarketSegment::Spot,
            &response_with(&[("x-mbx-used-weight-1m", "50")]),
        );
        let json = serde_json::to_value(telemetry.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"spot": {"usedWeight1m": "50"}, "futures": {}})
        );
    }
}
