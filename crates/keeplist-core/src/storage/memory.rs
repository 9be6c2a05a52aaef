//! In-process key-value store
//!
//! Used when nothing should touch disk (`--memory`) and throughout the
//! tests. An optional byte quota makes oversize writes fail the same way a
//! full browser storage area would.

use std::collections::HashMap;

use super::{KeyValueStore, StorageError, StorageResult};

/// Key-value store backed by a `HashMap`
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses to hold more than `bytes` in total
    ///
    /// Size is counted as key length plus value length across all entries.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Seed an entry directly, bypassing the quota
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Bytes currently used
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let available = quota.saturating_sub(self.used_bytes() - replaced);
            let size = key.len() + value.len();
            if size > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    available,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut store = MemoryStore::new();
        assert!(store.get("notes").unwrap().is_none());
        assert!(store.is_empty());

        store.set("notes", "[]").unwrap();
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);

        store.set("notes", "[1]").unwrap();
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_quota_rejects_oversize_write() {
        let mut store = MemoryStore::with_quota(16);
        store.set("k", "0123456789").unwrap();

        let err = store.set("k2", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));

        // Failed write leaves previous contents intact
        assert_eq!(store.get("k").unwrap().as_deref(), Some("0123456789"));
        assert!(store.get("k2").unwrap().is_none());
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut store = MemoryStore::with_quota(12);
        store.set("key", "12345678").unwrap();
        // Replacing the same key frees the old value first
        store.set("key", "87654321").unwrap();
        assert_eq!(store.used_bytes(), 11);
    }
}
