//! Core business logic module
//!
//! This module contains the course lifecycle components:
//! - `traits` - Record store and funds-transfer capabilities
//! - `engine` - Lifecycle state machine and administrative operations
//! - `admin` - Admin identity and pause/destroyed gates
//! - `course_store` - In-memory record store
//! - `ledger` - In-memory funds-transfer implementation
//! - `keys` - Course key derivation

pub mod admin;
pub mod course_store;
pub mod engine;
pub mod keys;
pub mod ledger;
pub mod traits;

pub use admin::AdminContext;
pub use course_store::CourseStore;
pub use engine::Marketplace;
pub use keys::{creation_hash, derive_course_hash};
pub use ledger::Ledger;
pub use traits::{FundsTransfer, RecordStore};
