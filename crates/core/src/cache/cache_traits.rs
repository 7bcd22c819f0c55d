use crate::errors::PersistenceError;

/// Storage handle for the serialized cache snapshot.
///
/// Implementations hold a single record. `read` returns `Ok(None)` when no
/// record was ever written; that is a cold start, not an error. `write`
/// replaces the record as a whole.
pub trait CacheStorage: Send + Sync {
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    fn write(&self, payload: &str) -> Result<(), PersistenceError>;
}
