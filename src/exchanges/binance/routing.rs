use crate::core::config::ClientConfig;
use crate::core::types::MarketSegment;

/// Pick the market segment that serves `path`.
///
/// Futures endpoints live under `/fapi` (and a few under `/futures`), but
/// `/sapi` endpoints are always served by the spot host, including the
/// spot-futures transfer endpoints whose path mentions futures.
pub fn segment_for_path(path: &str) -> MarketSegment {
    if (path.contains("/fapi") || path.contains("/futures")) && !path.contains("/sapi") {
        MarketSegment::Futures
    } else {
        MarketSegment::Spot
    }
}

/// Spot and futures hosts of one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinanceHosts {
    pub spot: String,
    pub futures: String,
}

impl BinanceHosts {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            spot: config.spot_host(),
            futures: config.futures_host(),
        }
    }

    pub fn host(&self, segment: MarketSegment) -> &str {
        match segment {
            MarketSegment::Spot => &self.spot,
            MarketSegment::Futures => &self.futures,
        }
    }

    /// Segment and host for `path`
    pub fn route(&self, path: &str) -> (MarketSegment, &str) {
        let segment = segment_for_path(path);
        (segment, self.host(segment))
    }
}
