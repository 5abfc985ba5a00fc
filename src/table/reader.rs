// file: src/table/reader.rs
// description: loads a csv file into a single arrow record batch
// reference: https://docs.rs/arrow-csv

use crate::error::{CleaningError, Result};
use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow_array::RecordBatch;
use arrow_schema::{ArrowError, DataType, Field, Schema};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Reads a whole csv file into memory.
///
/// Every column is read as text, so cells that are never coerced are written
/// back exactly as they were read. Numeric and date columns are coerced where
/// they are used.
pub struct CsvTableReader {
    batch_size: usize,
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self { batch_size: 8192 }
    }

    pub fn read(&self, path: &Path) -> Result<RecordBatch> {
        let label = path.display().to_string();
        let mut file = File::open(path).map_err(|e| CleaningError::file_operation(path, e))?;

        let format = Format::default().with_header(true);
        let (header, _) = format
            .infer_schema(&mut file, Some(0))
            .map_err(|e| parse_error(&label, e))?;
        debug!("Read {} column names from {}", header.fields().len(), label);

        file.seek(SeekFrom::Start(0))
            .map_err(|e| CleaningError::file_operation(path, e))?;

        let schema = Arc::new(text_schema(&header));
        let reader = ReaderBuilder::new(schema.clone())
            .with_format(format)
            .with_batch_size(self.batch_size)
            .build(file)
            .map_err(|e| parse_error(&label, e))?;

        let batches = reader
            .collect::<std::result::Result<Vec<_>, ArrowError>>()
            .map_err(|e| parse_error(&label, e))?;

        concat_batches(&schema, &batches).map_err(|e| parse_error(&label, e))
    }
}

fn text_schema(header: &Schema) -> Schema {
    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();
    Schema::new(fields)
}

fn parse_error(file: &str, err: ArrowError) -> CleaningError {
    CleaningError::Parse {
        file: file.to_string(),
        message: err.to_string(),
    }
}
