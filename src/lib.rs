//! Course Marketplace Engine Library
//! # Overview
//!
//! This library provides a course marketplace settlement engine and a
//! streaming CSV replay tool with both a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Course, Identity, OperationRecord, errors)
//! - [`config`] - TOML configuration and engine policies
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Course lifecycle state machine and admin operations
//!   - [`core::course_store`] - Course records keyed by hash and sequential id
//!   - [`core::ledger`] - Funds transfer with per-identity balances
//!   - [`core::admin`] - Admin identity and pause/destroyed gates
//! - [`io`] - CSV parsing and report output
//! - [`strategy`] - Pluggable processing pipelines
//!
//! # Course Lifecycle
//!
//! ```text
//! create ──▶ Purchased ──activate──▶ Activated
//!               │  ▲
//!     deactivate│  │repurchase
//!               ▼  │
//!            Deactivated
//! ```
//!
//! - **Create**: register a course owned by the caller at key `keccak256(id ++ caller)`
//! - **Purchase**: pay at least the price with the matching proof; the payment goes to the previous owner
//! - **Activate**: admin enables a purchased course
//! - **Deactivate**: admin disables a purchased course, zeroes its price and refunds the owner
//! - **Repurchase**: the owner reopens a deactivated course at a new price
//!
//! # Administration
//!
//! The admin can pause lifecycle operations, withdraw from the treasury, hand
//! over the admin role, and (while paused) drain the treasury or shut the
//! system down for good.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{MarketplaceConfig, PurchaseLookup, RefundPolicy};
pub use core::{CourseStore, FundsTransfer, Ledger, Marketplace, RecordStore};
pub use io::{write_accounts_csv, write_courses_csv};
pub use types::{
    Account, Amount, Course, CourseHash, CourseId, CourseIndex, CourseState, Identity,
    MarketplaceError, OperationKind, OperationRecord, Proof, TransferError,
};
