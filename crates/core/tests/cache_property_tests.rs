//! Property-based integration tests for the quote cache.
//!
//! Eviction must remove exactly the untracked entries, leave the rest
//! untouched, and be idempotent. Persistence must reproduce the map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockwidget_core::cache::{MemoryCacheStorage, QuoteCache};
use stockwidget_market_data::Quote;

// =============================================================================
// Generators
// =============================================================================

fn arb_symbol() -> impl Strategy<Value = String> {
    "[A-Z]{1,5}"
}

/// Prices in whole cents with an exact binary fraction, so the JSON float
/// round-trip is lossless.
fn arb_quote(symbol: String) -> impl Strategy<Value = Quote> {
    (1i64..100_000, -400i64..400, -40i64..40, 1_600_000_000i64..1_900_000_000).prop_map(
        move |(price_quarters, change_quarters, pct_quarters, secs)| {
            Quote::new(
                symbol.clone(),
                Decimal::new(price_quarters * 25, 2),
                Decimal::new(change_quarters * 25, 2),
                Decimal::new(pct_quarters * 25, 2),
                Utc.timestamp_opt(secs, 0).unwrap(),
            )
        },
    )
}

fn arb_entries() -> impl Strategy<Value = Vec<Quote>> {
    proptest::collection::btree_set(arb_symbol(), 0..12).prop_flat_map(|symbols| {
        symbols
            .into_iter()
            .map(arb_quote)
            .collect::<Vec<_>>()
    })
}

fn arb_keep() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_symbol(), 0..12)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Evict removes exactly the entries outside `keep` and leaves the rest identical.
    #[test]
    fn prop_evict_removes_exactly_untracked(entries in arb_entries(), keep in arb_keep()) {
        let cache = QuoteCache::in_memory();
        cache.put_many(entries.clone());

        let keep_set: BTreeSet<&str> = keep.iter().map(String::as_str).collect();
        let expected: BTreeMap<String, Quote> = entries
            .iter()
            .filter(|q| keep_set.contains(q.symbol.as_str()))
            .map(|q| (q.symbol.clone(), q.clone()))
            .collect();

        let removed = cache.evict(&keep);

        prop_assert_eq!(removed, entries.len() - expected.len());
        prop_assert_eq!(cache.snapshot().entries, expected);
    }

    /// A second evict with the same keep set is a no-op.
    #[test]
    fn prop_evict_is_idempotent(entries in arb_entries(), keep in arb_keep()) {
        let cache = QuoteCache::in_memory();
        cache.put_many(entries);

        cache.evict(&keep);
        let after_first = cache.snapshot().entries;

        prop_assert_eq!(cache.evict(&keep), 0);
        prop_assert_eq!(cache.snapshot().entries, after_first);
    }

    /// A fresh instance loads exactly what the previous one saved.
    #[test]
    fn prop_save_load_round_trip(entries in arb_entries()) {
        let storage = Arc::new(MemoryCacheStorage::new());
        let first = QuoteCache::persisted(storage.clone());
        first.put_many(entries.clone());
        first.save().unwrap();

        let second = QuoteCache::persisted(storage);
        prop_assert_eq!(second.load(), entries.len());
        prop_assert_eq!(second.snapshot().entries, first.snapshot().entries);
    }

    /// Every stored symbol reports real data; anything else gets the placeholder.
    #[test]
    fn prop_real_data_only_for_stored(entries in arb_entries(), probe in arb_symbol()) {
        let cache = QuoteCache::in_memory();
        cache.put_many(entries.clone());

        let stored = entries.iter().any(|q| q.symbol == probe);
        prop_assert_eq!(cache.has_real_data(&probe), stored);
        prop_assert_eq!(cache.get(&probe).last_updated.is_some(), stored);
    }
}
