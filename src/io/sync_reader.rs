//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<OperationRecord, MarketplaceError>` for each CSV row:
//!
//! ```no_run
//! use course_marketplace_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `ParseError` carrying the line number
//!
//! Rows are read one at a time, so memory use does not grow with the file.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{MarketplaceError, OperationRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, or `IoError` if it
    /// cannot be opened.
    pub fn new(path: &Path) -> Result<Self, MarketplaceError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MarketplaceError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                MarketplaceError::from(e)
            }
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, MarketplaceError>;

    /// Get the next operation record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(OperationRecord))` - Successfully parsed record
    /// * `Some(Err(MarketplaceError::ParseError))` - Row error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        let line = self.line_num;
        Some(
            row.map_err(MarketplaceError::from)
                .and_then(convert_csv_record)
                .map_err(|e| match e {
                    MarketplaceError::ParseError { message, .. } => MarketplaceError::ParseError {
                        line: Some(line),
                        message,
                    },
                    other => MarketplaceError::ParseError {
                        line: Some(line),
                        message: other.to_string(),
                    },
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CourseRef, OperationKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,caller,course,proof,amount,target\n";
    const SELLER: &str = "0x000000000000000000000000000000000000000a";
    const PROOF: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .and_then(|_| file.write_all(rows.as_bytes()))
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(MarketplaceError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_reader_iterates_create_row() {
        let file = create_temp_csv(&format!("create,{SELLER},,{PROOF},100,\n"));

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.kind, OperationKind::Create);
        assert_eq!(record.caller.to_string(), SELLER);
        assert_eq!(record.amount, Some(100));
    }

    #[test]
    fn test_sync_reader_accepts_short_rows() {
        let file = create_temp_csv(&format!("stop,{SELLER}\nactivate,{SELLER},0\n"));

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, OperationKind::Stop);
        assert_eq!(records[1].course, Some(CourseRef::Index(0)));
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let file = create_temp_csv(&format!("  withdraw  ,  {SELLER}  ,  ,  ,  25  ,\n"));

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.kind, OperationKind::Withdraw);
        assert_eq!(record.amount, Some(25));
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_csv(&format!(
            "stop,{SELLER}\nwithdraw,{SELLER},,,lots,\nresume,{SELLER}\n"
        ));

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        // Line 3 because of the header
        match &records[1] {
            Err(MarketplaceError::ParseError { line, message }) => {
                assert_eq!(*line, Some(3));
                assert!(message.contains("Invalid amount"));
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_reader_continues_after_error() {
        let file = create_temp_csv(&format!(
            "stop,{SELLER}\nrefund,{SELLER}\nresume,{SELLER}\n"
        ));

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[1].is_err());
        assert!(records[2].is_ok());
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("");
        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
