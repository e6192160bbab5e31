//! Core traits for record storage and funds transfer
//!
//! These are the two external capabilities the lifecycle engine calls into.
//! The crate ships in-memory implementations (`CourseStore`, `Ledger`); a host
//! platform can substitute its own persistent store or payment rail.

use crate::types::{
    Amount, Course, CourseHash, CourseIndex, Identity, MarketplaceError, TransferError,
};

/// Trait for storing course records
///
/// Holds two mappings, `key -> Course` and `sequential id -> key`, plus the
/// monotonic id counter. Records are never removed.
pub trait RecordStore {
    /// Insert a new record
    ///
    /// Fails with `KeyCollision` when a record is already present at `key`, and
    /// with `IndexOutOfSequence` when `course.id` is not the next id.
    fn insert(&mut self, key: CourseHash, course: Course) -> Result<(), MarketplaceError>;

    /// Replace an existing record in place
    ///
    /// Fails with `CourseIsNotCreated` when nothing is stored at `key`.
    fn put(&mut self, key: CourseHash, course: Course) -> Result<(), MarketplaceError>;

    /// Get a record by key
    fn get(&self, key: &CourseHash) -> Option<&Course>;

    /// Check whether a record is present at `key`
    fn exists(&self, key: &CourseHash) -> bool {
        self.get(key).is_some()
    }

    /// Key registered at a sequential id
    fn key_at(&self, index: CourseIndex) -> Option<CourseHash>;

    /// Number of sequential ids ever issued
    fn count(&self) -> CourseIndex;
}

/// Trait for moving funds to an identity
///
/// Implementations may fail; the engine rolls back the enclosing operation
/// when they do.
pub trait FundsTransfer {
    /// Transfer `amount` to `to`
    fn transfer(&mut self, to: &Identity, amount: Amount) -> Result<(), TransferError>;
}
