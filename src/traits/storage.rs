//! Persistent key/document store abstraction.
//!
//! Accessory state is persisted as whole JSON documents addressed by a key
//! (a file name on flash, a path on desktop). A store replaces a document
//! as one unit: readers see either the old or the new document, never a
//! partial write.

use crate::error::StoreResult;

/// Key/document store used for turnout persistence.
///
/// # Example
///
/// ```rust
/// use trainz_accessories::traits::ConfigStore;
/// use trainz_accessories::hal::MockStore;
///
/// let mut store = MockStore::new();
/// assert!(store.load("turnouts.json").unwrap().is_none());
///
/// store.store("turnouts.json", r#"{"count":0,"turnouts":[]}"#).unwrap();
/// assert!(store.load("turnouts.json").unwrap().is_some());
/// ```
pub trait ConfigStore {
    /// Read the document stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Atomically replace the document stored under `key`.
    fn store(&mut self, key: &str, contents: &str) -> StoreResult<()>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &mut S {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, contents: &str) -> StoreResult<()> {
        (**self).store(key, contents)
    }
}
