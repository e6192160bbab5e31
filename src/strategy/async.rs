//! Asynchronous pipelined processing strategy
//!
//! This module provides an asynchronous implementation of the
//! ProcessingStrategy trait. CSV reading runs as its own tokio task and hands
//! batches of records over a bounded channel to a single consumer that owns the
//! engine.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_pending_batches)
//!     ├── reader task: AsyncReader → mpsc::Sender<Vec<OperationRecord>>
//!     └── consumer: mpsc::Receiver → Marketplace (one record at a time)
//! ```
//!
//! # Ordering
//!
//! Operations on the marketplace are not independent: a purchase depends on the
//! create before it, a pause affects everything after it. The channel is FIFO
//! and there is exactly one consumer, so records reach the engine in file
//! order. Parsing of later batches overlaps with applying earlier ones.

use crate::core::Marketplace;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{apply_record, write_report, ProcessingStrategy, RunSettings};
use crate::types::{MarketplaceError, OperationRecord};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Maximum number of parsed batches waiting for the engine
    pub max_pending_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_pending_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_pending_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_pending_batches = if max_pending_batches == 0 {
            warn!(
                max_pending_batches,
                default = default.max_pending_batches,
                "Invalid pending batch limit, using default"
            );
            default.max_pending_batches
        } else {
            max_pending_batches
        };

        Self {
            batch_size,
            max_pending_batches,
        }
    }
}

/// Asynchronous pipelined processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    settings: RunSettings,
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(settings: RunSettings, config: BatchConfig) -> Self {
        Self { settings, config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process operations from input file and write the report to output
    ///
    /// 1. Builds a Marketplace from the configured settings
    /// 2. Creates a tokio multi-threaded runtime
    /// 3. Spawns a reader task that parses batches and sends them over a
    ///    bounded channel
    /// 4. Applies every received record to the engine in order
    /// 5. Writes the selected report
    ///
    /// # Errors
    ///
    /// Fatal errors (bad configuration, file not found, runtime or reader task
    /// failures, output errors) are returned. Individual rows are logged and
    /// skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), MarketplaceError> {
        let mut engine = Marketplace::from_config(&self.settings.marketplace)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MarketplaceError::FileNotFound {
                        path: input_path.display().to_string(),
                    }
                } else {
                    MarketplaceError::from(e)
                }
            })?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            let (sender, mut receiver) =
                mpsc::channel::<Vec<OperationRecord>>(self.config.max_pending_batches.max(1));
            let batch_size = self.config.batch_size;

            let reader_task = tokio::spawn(async move {
                let mut reader = AsyncReader::new(compat_file);
                let mut batches = 0usize;
                loop {
                    let batch = reader.read_batch(batch_size).await;
                    if batch.is_empty() {
                        break;
                    }
                    batches += 1;
                    if sender.send(batch).await.is_err() {
                        // Consumer is gone; nothing left to feed
                        break;
                    }
                }
                debug!(batches, "Reader finished");
            });

            let mut applied = 0usize;
            while let Some(batch) = receiver.recv().await {
                for record in batch {
                    apply_record(&mut engine, record);
                    applied += 1;
                }
            }

            reader_task.await.map_err(|e| MarketplaceError::IoError {
                message: format!("reader task failed: {}", e),
            })?;

            info!(
                rows = applied,
                courses = engine.course_count(),
                "Operation file processed"
            );
            Ok::<(), MarketplaceError>(())
        })?;

        write_report(&engine, self.settings.report, output)
    }
}
