// file: src/cleaning/dates.rs
// description: permissive conversion of a text column to calendar dates

use crate::error::Result;
use crate::table::replace_column;
use crate::table::schema::{column, permissive_cast};
use arrow::compute::cast_with_options;
use arrow_array::{Array, ArrayRef, Date32Array, RecordBatch, StringArray};
use arrow_schema::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug)]
pub struct DateNormalization {
    pub batch: RecordBatch,
    /// Non-empty values that could not be read as a date and became null.
    pub unparsed: usize,
    pub nulls: usize,
}

/// Parses the date part of common date and timestamp spellings.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|datetime| datetime.date_naive())
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    (date - DateTime::<Utc>::UNIX_EPOCH.date_naive()).num_days() as i32
}

/// Re-encodes `column_name` as a date column. Values that cannot be read
/// become null instead of failing the run.
pub fn normalize_dates(batch: &RecordBatch, column_name: &str) -> Result<DateNormalization> {
    let values = column(batch, column_name)?;

    if values.data_type() == &DataType::Date32 {
        return Ok(DateNormalization {
            batch: batch.clone(),
            unparsed: 0,
            nulls: values.null_count(),
        });
    }

    let text = cast_with_options(values, &DataType::Utf8, &permissive_cast())?;
    let text = text
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .unwrap_or_else(|| StringArray::new_null(values.len()));

    let mut unparsed = 0;
    let dates: Date32Array = text
        .iter()
        .map(|value| {
            let raw = value?;
            let parsed = parse_date(raw).map(days_since_epoch);
            if parsed.is_none() && !raw.trim().is_empty() {
                unparsed += 1;
            }
            parsed
        })
        .collect();

    let nulls = dates.null_count();
    let batch = replace_column(batch, column_name, Arc::new(dates) as ArrayRef)?;

    Ok(DateNormalization {
        batch,
        unparsed,
        nulls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Int64Array;

    fn reviews(values: Vec<Option<&str>>) -> RecordBatch {
        let ids: Vec<i64> = (0..values.len() as i64).collect();
        RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(ids)) as ArrayRef),
            ("last_review", Arc::new(StringArray::from(values)) as ArrayRef),
        ])
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2019-05-21"), Some(date(2019, 5, 21)));
        assert_eq!(parse_date(" 2019-05-21 "), Some(date(2019, 5, 21)));
        assert_eq!(parse_date("2019/05/21"), Some(date(2019, 5, 21)));
        assert_eq!(parse_date("05/21/2019"), Some(date(2019, 5, 21)));
        assert_eq!(parse_date("2019-05-21 13:45:00"), Some(date(2019, 5, 21)));
        assert_eq!(parse_date("2019-05-21T13:45:00Z"), Some(date(2019, 5, 21)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2019-02-30"), None);
    }

    #[test]
    fn test_normalize_dates() {
        let batch = reviews(vec![Some("2019-05-21"), None, Some("not a date"), Some("2018-10-19")]);
        let result = normalize_dates(&batch, "last_review").unwrap();

        assert_eq!(result.unparsed, 1);
        assert_eq!(result.nulls, 2);
        assert_eq!(result.batch.num_rows(), 4);

        let column = result.batch.column_by_name("last_review").unwrap();
        assert_eq!(column.data_type(), &DataType::Date32);

        let dates = column.as_any().downcast_ref::<Date32Array>().unwrap();
        assert_eq!(dates.value(0), 18037);
        assert_eq!(dates.value_as_date(3), Some(date(2018, 10, 19)));
        assert!(dates.is_null(1));
        assert!(dates.is_null(2));
    }

    #[test]
    fn test_normalize_dates_is_idempotent() {
        let batch = reviews(vec![Some("2019-05-21")]);
        let once = normalize_dates(&batch, "last_review").unwrap();
        let twice = normalize_dates(&once.batch, "last_review").unwrap();
        assert_eq!(once.batch, twice.batch);
        assert_eq!(twice.unparsed, 0);
    }

    #[test]
    fn test_normalize_missing_column() {
        let batch = reviews(vec![Some("2019-05-21")]);
        assert!(normalize_dates(&batch, "reviewed_on").is_err());
    }
}
