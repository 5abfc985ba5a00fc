// file: src/table/writer.rs
// description: serializes a record batch as csv with a header row
// reference: https://docs.rs/arrow-csv

use crate::error::{CleaningError, Result};
use arrow::csv::WriterBuilder;
use arrow_array::RecordBatch;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub rows: usize,
    pub bytes: u64,
}

/// Header row, no index column, ISO dates, empty fields for nulls.
pub struct CsvTableWriter {
    date_format: String,
}

impl Default for CsvTableWriter {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl CsvTableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `path` if it exists.
    pub fn write(&self, batch: &RecordBatch, path: &Path) -> Result<WriteStats> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CleaningError::file_operation(parent, e))?;
        }

        let file = File::create(path).map_err(|e| CleaningError::file_operation(path, e))?;
        let mut buffer = BufWriter::new(file);

        {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .with_date_format(self.date_format.clone())
                .build(&mut buffer);
            writer.write(batch)?;
        }

        buffer
            .flush()
            .map_err(|e| CleaningError::file_operation(path, e))?;

        let bytes = fs::metadata(path)
            .map_err(|e| CleaningError::file_operation(path, e))?
            .len();

        Ok(WriteStats {
            rows: batch.num_rows(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{ArrayRef, Date32Array, Float64Array, StringArray};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_write_with_dates_and_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clean.csv");

        // 18037 days after the epoch is 2019-05-21
        let batch = RecordBatch::try_from_iter(vec![
            (
                "name",
                Arc::new(StringArray::from(vec!["Cozy room", "Loft, Brooklyn"])) as ArrayRef,
            ),
            ("price", Arc::new(Float64Array::from(vec![50.5, 120.25])) as ArrayRef),
            (
                "last_review",
                Arc::new(Date32Array::from(vec![Some(18037), None])) as ArrayRef,
            ),
        ])
        .unwrap();

        let stats = CsvTableWriter::new().write(&batch, &path).unwrap();
        assert_eq!(stats.rows, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(stats.bytes, content.len() as u64);
        assert_eq!(
            content,
            "name,price,last_review\nCozy room,50.5,2019-05-21\n\"Loft, Brooklyn\",120.25,\n"
        );
    }

    #[test]
    fn test_empty_batch_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("empty.csv");

        let batch = RecordBatch::try_from_iter(vec![(
            "price",
            Arc::new(Float64Array::from(Vec::<f64>::new())) as ArrayRef,
        )])
        .unwrap();

        let stats = CsvTableWriter::new().write(&batch, &path).unwrap();
        assert_eq!(stats.rows, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "price\n");
    }
}
