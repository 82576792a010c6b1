//! Record repository access.
//!
//! The rules engine never owns record storage; it reads current record state
//! through the [`RawRepo`] trait. Records are keyed by (record id, agency
//! id), a missing entry is a normal outcome and drives the "new record"
//! paths. [`MemoryRepo`] is a complete in-memory implementation used by the
//! test suite and by embedders that stage records themselves.
//!
//! # Examples
//!
//! ```ignore
//! use opencat_rules::{MemoryRepo, RawRepo};
//!
//! let mut repo = MemoryRepo::new();
//! repo.add_record(common_record)?;
//! assert!(repo.record_exists("2 345 678 9", "191919")?);
//! ```

use indexmap::IndexMap;

use crate::error::{Result, UpdateError};
use crate::record::Record;

/// Read-only access to current record state.
pub trait RawRepo {
    /// Check whether a record is stored under (record id, agency id).
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Repository`] when the backing store fails.
    fn record_exists(&self, record_id: &str, agency_id: &str) -> Result<bool>;

    /// Fetch the stored record under (record id, agency id).
    ///
    /// A missing record is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Repository`] when the backing store fails.
    fn fetch_record(&self, record_id: &str, agency_id: &str) -> Result<Option<Record>>;

    /// Fetch the records whose 014a parent pointer names the given record
    /// under the same agency.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Repository`] when the backing store fails.
    fn relations_children(&self, record_id: &str, agency_id: &str) -> Result<Vec<Record>>;
}

/// In-memory [`RawRepo`] implementation.
///
/// Records are keyed by their own 001a/001b pair and iterated in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepo {
    records: IndexMap<(String, String), Record>,
}

impl MemoryRepo {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        MemoryRepo {
            records: IndexMap::new(),
        }
    }

    /// Store a record under its own 001a/001b key, replacing any previous
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::InvalidRecord`] when the record carries no
    /// 001a record id or no 001b agency id.
    pub fn add_record(&mut self, record: Record) -> Result<()> {
        let record_id = record
            .record_id()
            .ok_or_else(|| UpdateError::InvalidRecord("record without 001a".to_string()))?
            .to_string();
        let agency_id = record
            .agency_id()
            .ok_or_else(|| UpdateError::InvalidRecord("record without 001b".to_string()))?
            .to_string();
        self.records.insert((record_id, agency_id), record);
        Ok(())
    }

    /// Remove all stored records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// The number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RawRepo for MemoryRepo {
    fn record_exists(&self, record_id: &str, agency_id: &str) -> Result<bool> {
        Ok(self
            .records
            .contains_key(&(record_id.to_string(), agency_id.to_string())))
    }

    fn fetch_record(&self, record_id: &str, agency_id: &str) -> Result<Option<Record>> {
        Ok(self
            .records
            .get(&(record_id.to_string(), agency_id.to_string()))
            .cloned())
    }

    fn relations_children(&self, record_id: &str, agency_id: &str) -> Result<Vec<Record>> {
        Ok(self
            .records
            .values()
            .filter(|r| {
                r.first_value("014", 'a') == Some(record_id)
                    && r.agency_id() == Some(agency_id)
            })
            .cloned()
            .collect())
    }
}
