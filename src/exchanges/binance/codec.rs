//! Decoding of record families that the exchange sends without field names.
//!
//! Klines arrive as fixed-order arrays, aggregate trades as objects with
//! single-letter keys. Each family has one layout table here. Field names
//! starting with `_` are placeholders for values the exchange sends but the
//! client does not expose; they are dropped from the decoded record. A row
//! whose length is not one of its layout's accepted lengths is rejected.

use crate::core::errors::ExchangeError;
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

/// Ordered field names of a positional record
#[derive(Debug, Clone, Copy)]
pub struct PositionalLayout {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    /// Row lengths accepted on the wire; none may exceed `fields.len()`
    pub lengths: &'static [usize],
}

pub const CANDLE: PositionalLayout = PositionalLayout {
    name: "candle",
    fields: &[
        "openTime",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "closeTime",
        "quoteVolume",
        "trades",
        "baseAssetVolume",
        "quoteAssetVolume",
        "_ignore",
    ],
    // Current klines carry a trailing unused element; older payloads stop at 11
    lengths: &[11, 12],
};

/// Index-price and mark-price klines
pub const PRICE_KLINE: PositionalLayout = PositionalLayout {
    name: "price kline",
    fields: &[
        "openTime",
        "open",
        "high",
        "low",
        "close",
        "_volume",
        "closeTime",
        "_quoteVolume",
        "_basicDataCount",
        "_takerBuyVolume",
        "_takerBuyQuoteVolume",
        "_ignore",
    ],
    lengths: &[12],
};

pub const LEVERAGED_TOKEN_KLINE: PositionalLayout = PositionalLayout {
    name: "leveraged token kline",
    fields: &[
        "openTime",
        "open",
        "high",
        "low",
        "close",
        "realLeverage",
        "closeTime",
        "_quoteVolume",
        "navUpdates",
        "_ignore1",
        "_ignore2",
        "_ignore3",
    ],
    lengths: &[12],
};

impl PositionalLayout {
    /// Zip one row with the field table
    pub fn decode(&self, row: Value) -> Result<Record, ExchangeError> {
        let values = match row {
            Value::Array(values) => values,
            other => {
                return Err(ExchangeError::DeserializationError(format!(
                    "Expected {} array, got {}",
                    self.name, other
                )))
            }
        };

        if !self.lengths.contains(&values.len()) || values.len() > self.fields.len() {
            return Err(ExchangeError::DeserializationError(format!(
                "Expected {} to have {:?} fields, got {}",
                self.name,
                self.lengths,
                values.len()
            )));
        }

        Ok(self
            .fields
            .iter()
            .zip(values)
            .filter(|(field, _)| !is_placeholder(field))
            .map(|(field, value)| ((*field).to_string(), value))
            .collect())
    }
}

/// Key mapping for records sent as objects with abbreviated keys
#[derive(Debug, Clone, Copy)]
pub struct KeyedLayout {
    pub name: &'static str,
    /// (wire key, record field, required)
    pub fields: &'static [(&'static str, &'static str, bool)],
}

pub const AGG_TRADE: KeyedLayout = KeyedLayout {
    name: "aggregate trade",
    fields: &[
        ("a", "aggId", true),
        ("p", "price", true),
        ("q", "quantity", true),
        ("f", "firstId", true),
        ("l", "lastId", true),
        ("T", "timestamp", true),
        ("m", "isBuyerMaker", true),
        ("M", "wasBestPrice", false),
    ],
};

impl KeyedLayout {
    pub fn decode(&self, row: Value) -> Result<Record, ExchangeError> {
        let mut object = match row {
            Value::Object(object) => object,
            other => {
                return Err(ExchangeError::DeserializationError(format!(
                    "Expected {} object, got {}",
                    self.name, other
                )))
            }
        };

        let mut record = Record::new();
        for (key, field, required) in self.fields {
            match object.remove(*key) {
                Some(value) => {
                    record.insert((*field).to_string(), value);
                }
                None if *required => {
                    return Err(ExchangeError::DeserializationError(format!(
                        "{} is missing field '{}'",
                        self.name, key
                    )));
                }
                None => {}
            }
        }
        Ok(record)
    }
}

/// Records a layout can decode one row at a time
pub trait RowLayout {
    fn decode_row(&self, row: Value) -> Result<Record, ExchangeError>;
}

impl RowLayout for PositionalLayout {
    fn decode_row(&self, row: Value) -> Result<Record, ExchangeError> {
        self.decode(row)
    }
}

impl RowLayout for KeyedLayout {
    fn decode_row(&self, row: Value) -> Result<Record, ExchangeError> {
        self.decode(row)
    }
}

/// Decode a JSON array of rows; any malformed row fails the whole response
pub fn decode_rows(layout: &impl RowLayout, value: Value) -> Result<Vec<Record>, ExchangeError> {
    match value {
        Value::Array(rows) => rows.into_iter().map(|row| layout.decode_row(row)).collect(),
        other => Err(ExchangeError::DeserializationError(format!(
            "Expected an array of rows, got {}",
            other
        ))),
    }
}

fn is_placeholder(field: &str) -> bool {
    field.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candle_positional_zip() {
        let row = json!([1, "1", "2", "0.5", "1.5", "100", 2, "150", 10, "60", "90"]);
        let record = CANDLE.decode(row).unwrap();

        assert_eq!(record["openTime"], json!(1));
        assert_eq!(record["open"], json!("1"));
        assert_eq!(record["volume"], json!("100"));
        assert_eq!(record["trades"], json!(10));
        assert_eq!(record["quoteAssetVolume"], json!("90"));
        assert_eq!(record.len(), 11);
    }

    #[test]
    fn test_candle_with_trailing_placeholder_drops_it() {
        let row = json!([1, "1", "2", "0.5", "1.5", "100", 2, "150", 10, "60", "90", "0"]);
        let record = CANDLE.decode(row).unwrap();
        assert_eq!(record.len(), 11);
        assert!(!record.contains_key("_ignore"));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let row = json!([1, "1", "2", "0.5", "1.5", "100", 2, "150", 10, "60"]);
        let err = CANDLE.decode(row).unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
    }

    #[test]
    fn test_truncated_price_kline_is_rejected() {
        let row = json!([1, "1", "2", "0.5", "1.5", "0", 2]);
        let err = PRICE_KLINE.decode(row).unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));

        let eleven = json!([1, "1", "2", "0.5", "1.5", "0", 2, "0", 60, "0", "0"]);
        assert!(PRICE_KLINE.decode(eleven).is_err());
    }

    #[test]
    fn test_truncated_leveraged_token_kline_is_rejected() {
        let row = json!([1, "1", "2", "0.5", "1.5", "2.1", 2, "0", 6]);
        let err = LEVERAGED_TOKEN_KLINE.decode(row).unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
    }

    #[test]
    fn test_layout_lengths_fit_their_field_tables() {
        for layout in [CANDLE, PRICE_KLINE, LEVERAGED_TOKEN_KLINE] {
            assert!(
                layout.lengths.iter().all(|len| *len <= layout.fields.len()),
                "{}",
                layout.name
            );
        }
    }

    #[test]
    fn test_long_row_is_rejected() {
        let row = json!([1, "1", "2", "0.5", "1.5", "100", 2, "150", 10, "60", "90", "0", "extra"]);
        assert!(CANDLE.decode(row).is_err());
    }

    #[test]
    fn test_price_kline_keeps_only_exposed_fields() {
        let row = json!([1_591_256_400_000_u64, "9653.69", "9653.69", "9651.38", "9651.55", "0", 1_591_256_459_999_u64, "0", 60, "0", "0", "0"]);
        let record = PRICE_KLINE.decode(row).unwrap();
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(record["close"], json!("9651.55"));
        assert_eq!(record["closeTime"], json!(1_591_256_459_999_u64));
    }

    #[test]
    fn test_leveraged_token_kline() {
        let row = json!([1_585_713_600_000_u64, "1.2", "1.3", "1.1", "1.25", "2.1", 1_585_713_659_999_u64, "0", 6, "0", "0", "0"]);
        let record = LEVERAGED_TOKEN_KLINE.decode(row).unwrap();
        assert_eq!(record["realLeverage"], json!("2.1"));
        assert_eq!(record["navUpdates"], json!(6));
    }

    #[test]
    fn test_agg_trade_keyed_mapping() {
        let row = json!({"a": 26129, "p": "0.01633102", "q": "4.70443515", "f": 27781, "l": 27781, "T": 1_498_793_709_153_u64, "m": true, "M": true});
        let record = AGG_TRADE.decode(row).unwrap();
        assert_eq!(record["aggId"], json!(26129));
        assert_eq!(record["price"], json!("0.01633102"));
        assert_eq!(record["wasBestPrice"], json!(true));
    }

    #[test]
    fn test_agg_trade_optional_and_required_keys() {
        let futures_row = json!({"a": 1, "p": "1", "q": "1", "f": 1, "l": 1, "T": 1, "m": false});
        assert!(!AGG_TRADE.decode(futures_row).unwrap().contains_key("wasBestPrice"));

        let broken = json!({"a": 1, "p": "1", "q": "1", "f": 1, "l": 1, "m": false});
        assert!(AGG_TRADE.decode(broken).is_err());
    }

    #[test]
    fn test_decode_rows_fails_on_any_bad_row() {
        let value = json!([
            [1, "1", "2", "0.5", "1.5", "100", 2, "150", 10, "60", "90"],
            [1, "1"]
        ]);
        assert!(decode_rows(&CANDLE, value).is_err());
        assert!(decode_rows(&CANDLE, json!({"code": 0})).is_err());
    }
}
