//! Record store
//!
//! The `RecordStore` owns the ordered collection of records for one board
//! and round-trips it through a [`KeyValueStore`] as a JSON array.
//!
//! ## Loading
//!
//! Loading never fails. A missing key gives an empty collection; data that
//! is not JSON or not an array resets to empty. Inside a valid array,
//! entries that do not decode, have a blank title, use a status the board's
//! variant doesn't know, or repeat an earlier id are skipped. Whenever
//! something is dropped, the raw payload is copied to `<key>_corrupt` first.
//! An existing backup with different content is never overwritten; the copy
//! then goes to `<key>_corrupt_<hash>` instead.
//!
//! ## Saving
//!
//! Saving writes the whole collection. A failed save leaves the in-memory
//! collection untouched; it stays authoritative for the session.
//!
//! If the stored payload could not be read, or something was dropped and no
//! backup could be written, saves are refused with
//! [`StorageError::WriteBlocked`] until a later `load()` succeeds.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::{Record, RecordId, Variant};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// What `load()` found in the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Nothing stored under the key yet
    Missing,
    /// Records were read; `skipped` entries were unusable and dropped
    ///
    /// When anything was skipped, `backup_key` names the copy of the raw
    /// payload.
    Loaded {
        count: usize,
        skipped: usize,
        backup_key: Option<String>,
    },
    /// Stored data was unreadable; the collection was reset to empty
    ///
    /// When the raw payload could be read it is copied to `backup_key`
    /// before the next save overwrites it. Without a backup, saves are
    /// refused.
    Reset {
        reason: String,
        backup_key: Option<String>,
    },
}

/// Result of decoding a persisted collection
#[derive(Debug)]
pub(crate) struct Decoded {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Ordered record collection plus its persistence backend
pub struct RecordStore {
    backend: Box<dyn KeyValueStore>,
    variant: Variant,
    records: Vec<Record>,
    /// Why saving would destroy stored data, if it would
    write_blocked: Option<String>,
}

impl RecordStore {
    /// Create an empty store without reading the backend
    pub fn new(backend: Box<dyn KeyValueStore>, variant: Variant) -> Self {
        Self {
            backend,
            variant,
            records: Vec::new(),
            write_blocked: None,
        }
    }

    /// Create a store and load whatever the backend holds
    pub fn open(backend: Box<dyn KeyValueStore>, variant: Variant) -> (Self, LoadReport) {
        let mut store = Self::new(backend, variant);
        let report = store.load();
        (store, report)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Key the collection is stored under
    pub fn key(&self) -> &'static str {
        self.variant.storage_key()
    }

    /// Replace the in-memory collection with the persisted one
    pub fn load(&mut self) -> LoadReport {
        self.records.clear();
        self.write_blocked = None;

        let raw = match self.backend.get(self.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(key = self.key(), "No stored records, starting empty");
                return LoadReport::Missing;
            }
            Err(e) => {
                warn!(key = self.key(), "Failed to read records: {}", e);
                let reason = e.to_string();
                self.write_blocked = Some(reason.clone());
                return LoadReport::Reset {
                    reason,
                    backup_key: None,
                };
            }
        };

        match decode_records(&raw, self.variant) {
            Ok(decoded) => {
                self.records = decoded.records;
                let backup_key = if decoded.skipped > 0 {
                    let backup_key = self.backup_raw(&raw);
                    if backup_key.is_none() {
                        self.write_blocked =
                            Some(format!("{} unreadable record(s) not backed up", decoded.skipped));
                    }
                    backup_key
                } else {
                    None
                };
                info!(
                    key = self.key(),
                    count = self.records.len(),
                    skipped = decoded.skipped,
                    "Records loaded"
                );
                LoadReport::Loaded {
                    count: self.records.len(),
                    skipped: decoded.skipped,
                    backup_key,
                }
            }
            Err(reason) => {
                warn!(key = self.key(), "Stored records unreadable, resetting: {}", reason);
                let backup_key = self.backup_raw(&raw);
                if backup_key.is_none() {
                    self.write_blocked = Some(reason.clone());
                }
                LoadReport::Reset { reason, backup_key }
            }
        }
    }

    /// Copy an unreadable payload aside so it isn't lost on the next save
    ///
    /// Returns the key holding the copy. A backup that already holds this
    /// payload is reused without writing.
    fn backup_raw(&mut self, raw: &str) -> Option<String> {
        let base = format!("{}_corrupt", self.key());
        let slots = [base.clone(), format!("{}_{:016x}", base, payload_hash(raw))];

        for backup_key in slots {
            match self.backend.get(&backup_key) {
                Ok(Some(existing)) if existing == raw => {
                    debug!(key = self.key(), backup = %backup_key, "Payload already backed up");
                    return Some(backup_key);
                }
                Ok(Some(_)) => continue,
                Ok(None) => return self.write_backup(backup_key, raw),
                Err(e) => {
                    warn!(key = self.key(), backup = %backup_key, "Failed to check backup: {}", e);
                    continue;
                }
            }
        }

        warn!(key = self.key(), "No free backup slot for unreadable records");
        None
    }

    fn write_backup(&mut self, backup_key: String, raw: &str) -> Option<String> {
        match self.backend.set(&backup_key, raw) {
            Ok(()) => {
                info!(key = self.key(), backup = %backup_key, "Backed up unreadable records");
                Some(backup_key)
            }
            Err(e) => {
                warn!(key = self.key(), "Failed to back up unreadable records: {}", e);
                None
            }
        }
    }

    /// Write the full collection to the backend
    pub fn save(&mut self) -> StorageResult<()> {
        if let Some(reason) = &self.write_blocked {
            return Err(StorageError::WriteBlocked {
                key: self.key().to_string(),
                reason: reason.clone(),
            });
        }
        let json = self.to_json()?;
        self.backend.set(self.key(), &json)?;
        info!(key = self.key(), count = self.records.len(), "Records saved");
        Ok(())
    }

    /// Serialize the collection the way it is persisted
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }

    /// All records, most recently created first
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the backend (for inspection)
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: &RecordId) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| &r.id == id)
    }

    pub(crate) fn prepend(&mut self, record: Record) {
        self.records.insert(0, record);
    }
}

fn payload_hash(raw: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

/// Decode a persisted collection, dropping entries that break invariants
///
/// Returns `Err` only when the payload as a whole is unusable.
pub(crate) fn decode_records(raw: &str, variant: Variant) -> Result<Decoded, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Array(items) = value else {
        return Err("stored value is not an array".to_string());
    };

    let mut records: Vec<Record> = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        let record: Record = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(e) => {
                warn!(index, "Skipping undecodable record: {}", e);
                skipped += 1;
                continue;
            }
        };

        if record.title.trim().is_empty() {
            warn!(index, id = %record.id, "Skipping record with empty title");
            skipped += 1;
        } else if !variant.allows(record.status) {
            warn!(
                index,
                id = %record.id,
                status = %record.status,
                "Skipping record with status unknown to {} board",
                variant
            );
            skipped += 1;
        } else if records.iter().any(|r| r.id == record.id) {
            warn!(index, id = %record.id, "Skipping record with duplicate id");
            skipped += 1;
        } else {
            records.push(record);
        }
    }

    Ok(Decoded { records, skipped })
}
