//! Processing strategy module for marketplace operation files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both CSV parsing and engine processing. This allows different
//! processing implementations (synchronous, asynchronous pipelined) to be
//! selected at runtime. Every strategy applies operations to a single engine
//! in file order, so they produce identical reports for the same input.

use crate::cli::StrategyType;
use crate::config::MarketplaceConfig;
use crate::core::Marketplace;
use crate::io::csv_format::{write_accounts_csv, write_courses_csv};
use crate::types::{MarketplaceError, OperationRecord};
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Which final state a run writes to its output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// One row per course: index, hash, owner, price, state
    #[default]
    Courses,
    /// One row per identity that received funds: identity, balance
    Accounts,
}

/// Settings shared by every strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub marketplace: MarketplaceConfig,
    pub report: ReportKind,
}

impl RunSettings {
    pub fn new(marketplace: MarketplaceConfig, report: ReportKind) -> Self {
        Self {
            marketplace,
            report,
        }
    }
}

/// Processing strategy trait for complete pipelines
///
/// Each strategy reads operation records from a CSV file, applies them to a
/// freshly configured engine, and writes the requested report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process operations from input file and write the report to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration cannot build an engine (no admin)
    /// - The input file cannot be opened
    /// - The report cannot be written
    ///
    /// Rejected operations and malformed rows are logged and skipped; they do
    /// not cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), MarketplaceError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `settings` - Engine configuration and report selection
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    settings: RunSettings,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(settings)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(settings, config))
        }
    }
}

/// Apply one record, logging a rejection instead of failing the run
pub(crate) fn apply_record(engine: &mut Marketplace, record: OperationRecord) {
    let kind = record.kind;
    let caller = record.caller;
    if let Err(e) = engine.process(record) {
        warn!(op = %kind, %caller, error = %e, "Operation rejected");
    }
}

/// Write the selected report for the final engine state
pub(crate) fn write_report(
    engine: &Marketplace,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<(), MarketplaceError> {
    match report {
        ReportKind::Courses => write_courses_csv(&engine.courses(), output),
        ReportKind::Accounts => write_accounts_csv(&engine.funds().get_all_accounts(), output),
    }
}
