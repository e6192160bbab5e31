//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `identity`: fixed-width byte values (identities, course ids, hashes, proofs)
//! - `course`: course records and lifecycle states
//! - `operation`: operation kinds and parsed operation records
//! - `account`: ledger accounts receiving payouts
//! - `error`: Error types for the marketplace engine

pub mod account;
pub mod course;
pub mod error;
pub mod identity;
pub mod operation;

pub use account::Account;
pub use course::{Course, CourseState};
pub use error::{MarketplaceError, TransferError};
pub use identity::{Amount, CourseHash, CourseId, CourseIndex, Identity, Proof};
pub use operation::{CourseRef, OperationKind, OperationRecord};
