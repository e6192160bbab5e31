//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over operation records from a CSV file.
//! Supports batch reading so the async pipeline can hand whole batches to the
//! engine task.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of OperationRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::OperationRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Rows are read lazily, one batch at a time.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read a batch of operation records
    ///
    /// Reads up to `batch_size` rows, converting them to OperationRecords.
    /// Rows that fail to parse are logged with their line number and skipped.
    ///
    /// # Returns
    ///
    /// The converted records in file order. An empty vector means the end of
    /// the file was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;

            match row {
                Ok(csv_record) => match convert_csv_record(csv_record) {
                    Ok(record) => batch.push(record),
                    Err(e) => warn!(line = self.line_num, error = %e, "Skipping malformed row"),
                },
                Err(e) => warn!(line = self.line_num, error = %e, "CSV parse error"),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationKind;
    use futures::io::Cursor;

    const HEADER: &str = "op,caller,course,proof,amount,target\n";
    const ADMIN: &str = "0x00000000000000000000000000000000000000ad";

    fn reader_for(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{HEADER}{rows}").into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader_for(&format!(
            "stop,{ADMIN}\nresume,{ADMIN}\nwithdraw,{ADMIN},,,5,\n"
        ));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].kind, OperationKind::Stop);
        assert_eq!(batch[1].kind, OperationKind::Resume);

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, OperationKind::Withdraw);
        assert_eq!(batch[0].amount, Some(5));

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader_for("");
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let mut async_reader = reader_for(&format!(
            "refund,{ADMIN}\nstop,0x12\nwithdraw,{ADMIN},,,7,\n"
        ));

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, Some(7));
    }

    #[tokio::test]
    async fn test_async_reader_preserves_file_order() {
        let rows: String = (1..=5)
            .map(|amount| format!("withdraw,{ADMIN},,,{amount},\n"))
            .collect();
        let mut async_reader = reader_for(&rows);

        let mut amounts = Vec::new();
        loop {
            let batch = async_reader.read_batch(2).await;
            if batch.is_empty() {
                break;
            }
            amounts.extend(batch.iter().filter_map(|record| record.amount));
        }

        assert_eq!(amounts, vec![1, 2, 3, 4, 5]);
    }
}
