use crate::config::{MarketplaceConfig, PurchaseLookup, RefundPolicy};
use crate::strategy::{BatchConfig, ReportKind, RunSettings};
use crate::types::{Identity, MarketplaceError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay course marketplace operations and report the final state
#[derive(Parser, Debug)]
#[command(name = "course-marketplace")]
#[command(about = "Replay course marketplace operations and report the final state", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for synchronous or 'async' for pipelined reading"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of parsed batches waiting for the engine (async mode only)
    #[arg(
        long = "max-pending",
        value_name = "COUNT",
        help = "Maximum number of parsed batches waiting for the engine (default: CPU cores)"
    )]
    pub max_pending_batches: Option<usize>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Platform admin identity, overriding the configuration file
    #[arg(long = "admin", value_name = "IDENTITY")]
    pub admin: Option<Identity>,

    /// Deactivation refund policy, overriding the configuration file
    #[arg(long = "refund-policy", value_name = "POLICY")]
    pub refund_policy: Option<RefundPolicy>,

    /// How purchases locate courses, overriding the configuration file
    #[arg(long = "purchase-lookup", value_name = "LOOKUP")]
    pub purchase_lookup: Option<PurchaseLookup>,

    /// Report written to stdout
    #[arg(long = "report", value_name = "REPORT", default_value = "courses")]
    pub report: ReportKind,

    /// Default log filter when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced with
    /// the defaults and logged.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_pending_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_pending_batches
                    .unwrap_or(default.max_pending_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Build the marketplace configuration
    ///
    /// Starts from the configuration file when one is given, then applies the
    /// command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn to_marketplace_config(&self) -> Result<MarketplaceConfig, MarketplaceError> {
        let mut config = match &self.config {
            Some(path) => MarketplaceConfig::load(path)?,
            None => MarketplaceConfig::default(),
        };

        if let Some(admin) = self.admin {
            config.admin = Some(admin);
        }
        if let Some(policy) = self.refund_policy {
            config.refund_policy = policy;
        }
        if let Some(lookup) = self.purchase_lookup {
            config.purchase_lookup = lookup;
        }

        Ok(config)
    }

    /// Settings for the processing strategy
    pub fn to_run_settings(&self) -> Result<RunSettings, MarketplaceError> {
        Ok(RunSettings::new(self.to_marketplace_config()?, self.report))
    }
}
