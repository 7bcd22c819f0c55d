use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockwidget_market_data::Quote;

/// Persisted form of the quote cache.
///
/// Always written as a whole; a reader either sees the previous snapshot or
/// the new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub saved_at: DateTime<Utc>,
    pub entries: BTreeMap<String, Quote>,
}

impl CacheSnapshot {
    pub fn new(saved_at: DateTime<Utc>, entries: BTreeMap<String, Quote>) -> Self {
        Self { saved_at, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
