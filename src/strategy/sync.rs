//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It coordinates the SyncReader (CSV input), the
//! Marketplace engine (business logic) and the report writers (output).
//!
//! Rows are streamed one at a time, so memory use is bounded by the number of
//! courses and accounts, not by the length of the operation file.

use crate::core::Marketplace;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{apply_record, write_report, ProcessingStrategy, RunSettings};
use crate::types::MarketplaceError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use course_marketplace_engine::config::MarketplaceConfig;
/// use course_marketplace_engine::strategy::{
///     ProcessingStrategy, ReportKind, RunSettings, SyncProcessingStrategy,
/// };
/// use std::path::Path;
///
/// let config = MarketplaceConfig::load(Path::new("marketplace.toml")).unwrap();
/// let strategy = SyncProcessingStrategy::new(RunSettings::new(config, ReportKind::Courses));
///
/// strategy
///     .process(Path::new("operations.csv"), &mut std::io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    settings: RunSettings,
}

impl SyncProcessingStrategy {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process operations from input file and write the report to output
    ///
    /// 1. Builds a Marketplace from the configured settings
    /// 2. Streams records from the CSV file through a SyncReader
    /// 3. Applies each record to the engine in file order
    /// 4. Writes the selected report
    ///
    /// Malformed rows and rejected operations are logged and skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), MarketplaceError> {
        let mut engine = Marketplace::from_config(&self.settings.marketplace)?;
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        for result in reader {
            match result {
                Ok(record) => {
                    apply_record(&mut engine, record);
                    applied += 1;
                }
                Err(e) => warn!(error = %e, "Skipping malformed row"),
            }
        }

        info!(
            rows = applied,
            courses = engine.course_count(),
            "Operation file processed"
        );
        write_report(&engine, self.settings.report, output)
    }
}
