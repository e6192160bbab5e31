//! Ledger account types
//!
//! This module defines the Account structure held by the in-memory ledger
//! that receives marketplace payouts.

use super::identity::{Amount, Identity};

/// Ledger account state
///
/// Represents the funds received by one identity, and whether the identity
/// refuses incoming transfers.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The identity owning this account
    pub identity: Identity,

    /// Funds received so far
    pub balance: Amount,

    /// Whether incoming transfers are refused
    ///
    /// A rejecting account makes every transfer to it fail, including
    /// zero-value ones. This models a recipient that cannot accept funds.
    pub rejects_transfers: bool,
}

impl Account {
    /// Create a new account with a zero balance that accepts transfers
    pub fn new(identity: Identity) -> Self {
        Account {
            identity,
            balance: 0,
            rejects_transfers: false,
        }
    }
}
