//! Synthetic quote generator.
//!
//! Used when no API key is configured, so a fresh install shows moving
//! numbers instead of the fixed placeholder. Known tickers start from a seed
//! base price; anything else gets a random base in `[100, 500)`. A random
//! delta in `[-5, 5)` is then applied.
//!
//! This path never fails and always stamps `last_updated` with `now`.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::Quote;

/// Seed base prices, matched by substring so `SPY.L` still maps to `SPY`.
const SEED_PRICES: &[(&str, f64)] = &[
    ("SPY", 450.0),
    ("AAPL", 175.0),
    ("TSLA", 250.0),
    ("NVDA", 800.0),
];

const FALLBACK_BASE_MIN: f64 = 100.0;
const FALLBACK_BASE_SPAN: f64 = 400.0;
const MAX_ABS_DELTA: f64 = 5.0;

/// Base price the synthetic generator starts from for `symbol`.
pub fn base_price_for<R: Rng + ?Sized>(symbol: &str, rng: &mut R) -> f64 {
    SEED_PRICES
        .iter()
        .find(|(ticker, _)| symbol.contains(ticker))
        .map(|(_, price)| *price)
        .unwrap_or_else(|| FALLBACK_BASE_MIN + rng.gen::<f64>() * FALLBACK_BASE_SPAN)
}

/// Generate a randomized quote for `symbol` stamped at `now`.
pub fn synthesize_quote<R: Rng + ?Sized>(symbol: &str, now: DateTime<Utc>, rng: &mut R) -> Quote {
    let base = to_cents(base_price_for(symbol, rng));
    let change = to_cents((rng.gen::<f64>() - 0.5) * 2.0 * MAX_ABS_DELTA);
    let percent_change = (change / base * Decimal::ONE_HUNDRED).round_dp(2);

    Quote::new(symbol, base + change, change, percent_change, now)
}

fn to_cents(value: f64) -> Decimal {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seed_prices_for_known_tickers() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(base_price_for("SPY", &mut rng), 450.0);
        assert_eq!(base_price_for("AAPL", &mut rng), 175.0);
        assert_eq!(base_price_for("TSLA", &mut rng), 250.0);
        assert_eq!(base_price_for("NVDA", &mut rng), 800.0);
    }

    #[test]
    fn test_seed_prices_match_by_substring() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(base_price_for("NASDAQ:AAPL", &mut rng), 175.0);
    }

    #[test]
    fn test_unknown_ticker_base_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let base = base_price_for("ZZZZ", &mut rng);
            assert!((100.0..500.0).contains(&base), "base {} out of range", base);
        }
    }

    #[test]
    fn test_synthesized_quote_is_real_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        for _ in 0..200 {
            let quote = synthesize_quote("AAPL", now, &mut rng);
            assert_eq!(quote.symbol, "AAPL");
            assert_eq!(quote.last_updated, Some(now));
            assert!(quote.change >= dec!(-5.00) && quote.change <= dec!(5.00));
            assert_eq!(quote.price, dec!(175.00) + quote.change);
        }
    }

    #[test]
    fn test_percent_change_follows_change() {
        let mut rng = StdRng::seed_from_u64(99);
        let quote = synthesize_quote("SPY", Utc::now(), &mut rng);
        let expected = (quote.change / dec!(450) * dec!(100)).round_dp(2);
        assert_eq!(quote.percent_change, expected);
    }
}
