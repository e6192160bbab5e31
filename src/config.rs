//! Marketplace configuration
//!
//! Settings are read from an optional TOML file and may be overridden from
//! the command line.
//!
//! ```toml
//! admin = "0x00000000000000000000000000000000000000ad"
//! refund_policy = "zeroed"        # or "prior_price"
//! purchase_lookup = "derived"     # or "indexed"
//! initial_balance = 0            # or a decimal string beyond 64 bits
//!
//! [ledger]
//! rejecting = ["0x00000000000000000000000000000000000000bb"]
//! ```

use crate::types::{Amount, Identity, MarketplaceError};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Amount refunded to the owner when a course is deactivated
///
/// The price is zeroed as part of the deactivation. `Zeroed` reads the refund
/// amount after that, so the refund transfer always carries zero. `PriorPrice`
/// refunds the price the course had before deactivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RefundPolicy {
    #[default]
    Zeroed,
    PriorPrice,
}

/// How a purchase locates the course it buys
///
/// `Derived` hashes the buyer-supplied course id with the buyer's identity,
/// which only finds courses the buyer created. `Indexed` reads the course id
/// as a sequential index and resolves the key through the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseLookup {
    #[default]
    Derived,
    Indexed,
}

/// Ledger section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Identities that refuse every incoming transfer
    #[serde(default)]
    pub rejecting: Vec<Identity>,
}

/// Complete marketplace configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketplaceConfig {
    /// Platform admin identity (required before an engine can be built)
    pub admin: Option<Identity>,

    #[serde(default)]
    pub refund_policy: RefundPolicy,

    #[serde(default)]
    pub purchase_lookup: PurchaseLookup,

    /// Funds held by the treasury before the first operation
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub initial_balance: Amount,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Read an amount from a TOML integer or a decimal string
///
/// TOML integers stop at 64 bits, so larger amounts are written as strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Integer(u64),
        Decimal(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Integer(value) => Ok(Amount::from(value)),
        RawAmount::Decimal(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid amount '{}'", text))
        }),
    }
}

impl MarketplaceConfig {
    /// Configuration administered by `admin` with default settings
    pub fn with_admin(admin: Identity) -> Self {
        MarketplaceConfig {
            admin: Some(admin),
            ..Self::default()
        }
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `IoError` if the file cannot be read
    /// - `InvalidConfig` if the TOML is malformed or has unknown keys
    pub fn load(path: &Path) -> Result<Self, MarketplaceError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MarketplaceError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                MarketplaceError::from(e)
            }
        })?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded marketplace configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, MarketplaceError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured admin identity
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when no admin is set or the admin is the zero
    /// identity.
    pub fn admin(&self) -> Result<Identity, MarketplaceError> {
        match self.admin {
            Some(admin) if !admin.is_zero() => Ok(admin),
            Some(_) => Err(MarketplaceError::invalid_config(
                "admin must not be the zero identity",
            )),
            None => Err(MarketplaceError::invalid_config("no admin identity configured")),
        }
    }
}
