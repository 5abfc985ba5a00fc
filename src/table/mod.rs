// file: src/table/mod.rs
// description: tabular layer over arrow record batches
// reference: https://docs.rs/arrow

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::CsvTableReader;
pub use schema::{REQUIRED_COLUMNS, float_column, replace_column, require_columns};
pub use writer::{CsvTableWriter, WriteStats};
