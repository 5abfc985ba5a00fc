// file: src/table/schema.rs
// description: column presence checks, numeric coercion and column replacement
// reference: https://docs.rs/arrow-schema

use crate::error::{CleaningError, Result};
use arrow::compute::{CastOptions, can_cast_types, cast_with_options};
use arrow_array::{Array, ArrayRef, Float64Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["price", "last_review", "longitude", "latitude"];

pub fn require_columns(batch: &RecordBatch, columns: &[&str]) -> Result<()> {
    let schema = batch.schema();
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CleaningError::Schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

pub(crate) fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| CleaningError::Schema(format!("missing required column: {}", name)))
}

pub(crate) fn permissive_cast() -> CastOptions<'static> {
    CastOptions {
        safe: true,
        ..Default::default()
    }
}

/// Reads a column as f64. Values that are not numbers become null.
pub fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let array = column(batch, name)?;
    let options = permissive_cast();

    let cast = if can_cast_types(array.data_type(), &DataType::Float64) {
        cast_with_options(array, &DataType::Float64, &options)?
    } else {
        let text = cast_with_options(array, &DataType::Utf8, &options)?;
        cast_with_options(&text, &DataType::Float64, &options)?
    };

    cast.as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| CleaningError::Schema(format!("column {} is not numeric", name)))
}

/// Swaps one column for `values`, keeping its position and name.
pub fn replace_column(batch: &RecordBatch, name: &str, values: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let index = schema
        .index_of(name)
        .map_err(|_| CleaningError::Schema(format!("missing required column: {}", name)))?;

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if i == index {
                Field::new(name, values.data_type().clone(), true)
            } else {
                field.as_ref().clone()
            }
        })
        .collect();

    let mut columns = batch.columns().to_vec();
    columns[index] = values;

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
