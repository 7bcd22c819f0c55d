use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder price shown for symbols that were never fetched.
pub const PLACEHOLDER_PRICE: Decimal = Decimal::from_parts(15000, 0, 0, false, 2);

/// Placeholder absolute change shown for symbols that were never fetched.
pub const PLACEHOLDER_CHANGE: Decimal = Decimal::from_parts(245, 0, 0, false, 2);

/// Placeholder percent change shown for symbols that were never fetched.
pub const PLACEHOLDER_PERCENT_CHANGE: Decimal = Decimal::from_parts(165, 0, 0, false, 2);

/// Price snapshot for one symbol.
///
/// `last_updated == None` marks placeholder data that was never verified
/// against a provider. Any timestamp marks real data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Canonical (uppercase) ticker
    pub symbol: String,

    /// Current price
    pub price: Decimal,

    /// Absolute change since the previous close
    pub change: Decimal,

    /// Percent change since the previous close
    pub percent_change: Decimal,

    /// When the quote was fetched; serialized as epoch millis, `0` for never
    #[serde(with = "last_updated_millis")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Quote {
    /// Create a verified quote fetched at `fetched_at`.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        change: Decimal,
        percent_change: Decimal,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change,
            percent_change,
            last_updated: Some(fetched_at),
        }
    }

    /// The default quote served for symbols with no fetch history.
    pub fn placeholder(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: PLACEHOLDER_PRICE,
            change: PLACEHOLDER_CHANGE,
            percent_change: PLACEHOLDER_PERCENT_CHANGE,
            last_updated: None,
        }
    }

    /// True when this quote came from a provider (or the synthetic generator).
    pub fn is_real(&self) -> bool {
        self.last_updated.is_some()
    }

    /// True when the price moved up or stayed flat.
    pub fn is_gain(&self) -> bool {
        self.change >= Decimal::ZERO
    }
}

mod last_updated_millis {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.map(|v| v.timestamp_millis()).unwrap_or(0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        if millis <= 0 {
            return Ok(None);
        }
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid lastUpdated timestamp: {}", millis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_placeholder_constants() {
        let quote = Quote::placeholder("AAPL");
        assert_eq!(quote.price, dec!(150.00));
        assert_eq!(quote.change, dec!(2.45));
        assert_eq!(quote.percent_change, dec!(1.65));
        assert!(quote.last_updated.is_none());
        assert!(!quote.is_real());
    }

    #[test]
    fn test_new_quote_is_real() {
        let quote = Quote::new("SPY", dec!(450.5), dec!(-1.25), dec!(-0.28), Utc::now());
        assert!(quote.is_real());
        assert!(!quote.is_gain());
    }

    #[test]
    fn test_serialized_layout() {
        let fetched_at = Utc.timestamp_millis_opt(1_704_067_200_000).unwrap();
        let quote = Quote::new("AAPL", dec!(175.25), dec!(1.5), dec!(0.86), fetched_at);
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["lastUpdated"], 1_704_067_200_000i64);
        assert!(json.get("percentChange").is_some());
        assert!(json.get("change").is_some());
    }

    #[test]
    fn test_zero_last_updated_reads_as_never() {
        let json = r#"{
            "symbol": "TSLA",
            "price": 150.0,
            "change": 2.45,
            "percentChange": 1.65,
            "lastUpdated": 0
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert!(quote.last_updated.is_none());
    }

    #[test]
    fn test_placeholder_serializes_never_as_zero() {
        let json = serde_json::to_value(Quote::placeholder("NVDA")).unwrap();
        assert_eq!(json["lastUpdated"], 0);
    }
}
