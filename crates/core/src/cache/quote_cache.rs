use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use log::{debug, error, warn};
use stockwidget_market_data::Quote;

use super::{CacheSnapshot, CacheStorage};
use crate::errors::PersistenceError;

/// Last-known quote per symbol.
///
/// The cache is created once per process in one of two modes:
///
/// - [`QuoteCache::in_memory`]: nothing is persisted.
/// - [`QuoteCache::persisted`]: every mutation rewrites the whole snapshot
///   through the storage handle, and the first read on an empty cache loads
///   the previous snapshot.
///
/// Reads never fail. Persistence failures are logged and swallowed; the
/// in-memory map stays authoritative.
pub struct QuoteCache {
    entries: RwLock<BTreeMap<String, Quote>>,
    storage: Option<Arc<dyn CacheStorage>>,
    load_attempted: AtomicBool,
}

impl QuoteCache {
    /// Cache with no persistence.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            storage: None,
            load_attempted: AtomicBool::new(true),
        }
    }

    /// Cache backed by `storage`.
    pub fn persisted(storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            storage: Some(storage),
            load_attempted: AtomicBool::new(false),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.storage.is_some()
    }

    /// Stored quote for `symbol`, or the placeholder when none exists.
    pub fn get(&self, symbol: &str) -> Quote {
        self.ensure_loaded();
        self.read_entries()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Quote::placeholder(symbol))
    }

    /// Inserts or overwrites the entry for `symbol`.
    pub fn put(&self, symbol: &str, quote: Quote) {
        self.ensure_loaded();
        let mut entries = self.write_entries();
        entries.insert(symbol.to_string(), quote);
        self.persist(&entries);
    }

    /// Inserts a batch of quotes with a single persistence write.
    pub fn put_many(&self, quotes: impl IntoIterator<Item = Quote>) {
        self.ensure_loaded();
        let mut entries = self.write_entries();
        let mut changed = false;
        for quote in quotes {
            entries.insert(quote.symbol.clone(), quote);
            changed = true;
        }
        if changed {
            self.persist(&entries);
        }
    }

    /// True when a stored entry exists and carries a fetch timestamp.
    pub fn has_real_data(&self, symbol: &str) -> bool {
        self.ensure_loaded();
        self.read_entries()
            .get(symbol)
            .is_some_and(Quote::is_real)
    }

    pub fn all_symbols(&self) -> BTreeSet<String> {
        self.ensure_loaded();
        self.read_entries().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ensure_loaded();
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry whose symbol is not in `keep`.
    ///
    /// Returns the number of removed entries. The snapshot is rewritten only
    /// when something was removed.
    pub fn evict<S: AsRef<str>>(&self, keep: &[S]) -> usize {
        self.ensure_loaded();
        let keep: HashSet<&str> = keep.iter().map(AsRef::as_ref).collect();

        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|symbol, _| keep.contains(symbol.as_str()));
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Evicted {} stale cache entries", removed);
            self.persist(&entries);
        }
        removed
    }

    /// Copy of the current contents stamped with the current time.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.ensure_loaded();
        CacheSnapshot::new(Utc::now(), self.read_entries().clone())
    }

    /// Replaces the in-memory map with the persisted snapshot.
    ///
    /// Returns the number of entries loaded. A missing record leaves the cache
    /// untouched. A corrupted record clears the cache. A read failure keeps
    /// the current contents.
    pub fn load(&self) -> usize {
        let mut entries = self.write_entries();
        self.load_attempted.store(true, Ordering::SeqCst);
        self.load_into(&mut entries)
    }

    /// Writes the whole map to storage. No-op for an in-memory cache.
    pub fn save(&self) -> Result<(), PersistenceError> {
        self.ensure_loaded();
        let entries = self.read_entries();
        self.write_snapshot(&entries)
    }

    /// One-time load on first use of an empty cache. The flag is checked and
    /// set under the write guard.
    fn ensure_loaded(&self) {
        if self.load_attempted.load(Ordering::SeqCst) {
            return;
        }
        let mut entries = self.write_entries();
        if self.load_attempted.swap(true, Ordering::SeqCst) {
            return;
        }
        if entries.is_empty() {
            self.load_into(&mut entries);
        }
    }

    fn load_into(&self, entries: &mut BTreeMap<String, Quote>) -> usize {
        let Some(storage) = &self.storage else {
            return 0;
        };

        let record = match storage.read() {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No cache snapshot found, starting cold");
                return 0;
            }
            Err(e) => {
                warn!("Keeping in-memory quotes: {}", e);
                return 0;
            }
        };

        match serde_json::from_str::<CacheSnapshot>(&record) {
            Ok(snapshot) => {
                *entries = snapshot.entries;
                debug!(
                    "Loaded {} cached quotes saved at {}",
                    entries.len(),
                    snapshot.saved_at
                );
                entries.len()
            }
            Err(e) => {
                error!("Discarding corrupted cache snapshot: {}", e);
                entries.clear();
                0
            }
        }
    }

    /// Called with the write guard held so snapshots never interleave.
    fn persist(&self, entries: &BTreeMap<String, Quote>) {
        if let Err(e) = self.write_snapshot(entries) {
            error!("Failed to persist quote cache: {}", e);
        }
    }

    fn write_snapshot(&self, entries: &BTreeMap<String, Quote>) -> Result<(), PersistenceError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let snapshot = CacheSnapshot::new(Utc::now(), entries.clone());
        let payload = serde_json::to_string(&snapshot)
            .map_err(|e| PersistenceError::Write(e.to_string()))?;
        storage.write(&payload)
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, BTreeMap<String, Quote>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Quote cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Quote>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Quote cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::in_memory()
    }
}
