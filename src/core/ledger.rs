//! Ledger module
//!
//! This module provides the `Ledger` struct, an in-memory balance book that
//! implements the `FundsTransfer` capability for the marketplace engine.
//!
//! The Ledger is responsible for:
//! - Creating accounts on first payout
//! - Crediting payouts with checked arithmetic
//! - Refusing transfers to accounts marked as rejecting
//! - Providing sorted account listings for output

use crate::core::traits::FundsTransfer;
use crate::types::{Account, Amount, Identity, TransferError};
use std::collections::HashMap;

/// Balance book of every identity that received funds
#[derive(Debug, Default)]
pub struct Ledger {
    /// Map of identities to account states
    accounts: HashMap<Identity, Account>,
}

impl Ledger {
    /// Create a new Ledger with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Ledger where the given identities refuse every transfer
    pub fn with_rejecting<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = Identity>,
    {
        let mut ledger = Self::new();
        for identity in identities {
            ledger.set_rejecting(identity, true);
        }
        ledger
    }

    /// Get or create the account for an identity
    pub fn get_or_create_account(&mut self, identity: Identity) -> &mut Account {
        self.accounts
            .entry(identity)
            .or_insert_with(|| Account::new(identity))
    }

    /// Mark whether an identity refuses incoming transfers
    pub fn set_rejecting(&mut self, identity: Identity, rejects: bool) {
        self.get_or_create_account(identity).rejects_transfers = rejects;
    }

    /// Balance held by an identity (zero when it has no account)
    pub fn balance_of(&self, identity: &Identity) -> Amount {
        self.accounts
            .get(identity)
            .map_or(0, |account| account.balance)
    }

    /// Get all accounts sorted by identity
    ///
    /// Sorting gives deterministic output for CSV generation.
    pub fn get_all_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|account| account.identity);
        accounts
    }
}

impl FundsTransfer for Ledger {
    /// Credit `amount` to `to`
    ///
    /// # Errors
    ///
    /// - `RecipientRejected` if the recipient refuses transfers (any amount)
    /// - `BalanceOverflow` if the credit would overflow the recipient's balance
    fn transfer(&mut self, to: &Identity, amount: Amount) -> Result<(), TransferError> {
        let account = self.get_or_create_account(*to);

        if account.rejects_transfers {
            return Err(TransferError::RecipientRejected { to: *to });
        }

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow { to: *to })?;

        Ok(())
    }
}
