// file: src/cleaning/filters.rs
// description: price band and bounding box row filters
// reference: boolean masks over arrow record batches

use crate::error::Result;
use crate::table::float_column;
use arrow::compute::filter_record_batch;
use arrow_array::{BooleanArray, RecordBatch};

/// Inclusive price band. An inverted band matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Inclusive longitude/latitude rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.min_longitude
            && longitude <= self.max_longitude
            && latitude >= self.min_latitude
            && latitude <= self.max_latitude
    }
}

/// Approximate New York City area. Not configurable.
pub const NYC_BOUNDING_BOX: BoundingBox = BoundingBox {
    min_longitude: -74.25,
    max_longitude: -73.50,
    min_latitude: 40.5,
    max_latitude: 41.2,
};

/// Rows with a missing or non-numeric price map to `false`.
pub fn price_mask(batch: &RecordBatch, range: PriceRange) -> Result<BooleanArray> {
    let prices = float_column(batch, "price")?;
    Ok(prices
        .iter()
        .map(|price| Some(price.is_some_and(|p| range.contains(p))))
        .collect())
}

/// Rows with a missing or non-numeric coordinate map to `false`.
pub fn geo_mask(batch: &RecordBatch, bbox: BoundingBox) -> Result<BooleanArray> {
    let longitudes = float_column(batch, "longitude")?;
    let latitudes = float_column(batch, "latitude")?;
    Ok(longitudes
        .iter()
        .zip(latitudes.iter())
        .map(|(lon, lat)| match (lon, lat) {
            (Some(lon), Some(lat)) => Some(bbox.contains(lon, lat)),
            _ => Some(false),
        })
        .collect())
}

/// Keeps the rows where `mask` is true, preserving their order.
pub fn apply_mask(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    Ok(filter_record_batch(batch, mask)?)
}

pub fn filter_price(batch: &RecordBatch, range: PriceRange) -> Result<RecordBatch> {
    let mask = price_mask(batch, range)?;
    apply_mask(batch, &mask)
}

pub fn filter_bounding_box(batch: &RecordBatch, bbox: BoundingBox) -> Result<RecordBatch> {
    let mask = geo_mask(batch, bbox)?;
    apply_mask(batch, &mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleaningError;
    use arrow_array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
    use std::sync::Arc;

    fn listings() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6])) as ArrayRef),
            (
                "price",
                Arc::new(StringArray::from(vec![
                    Some("50"),
                    Some("5"),
                    Some("10"),
                    Some("100"),
                    None,
                    Some("free"),
                ])) as ArrayRef,
            ),
            (
                "longitude",
                Arc::new(Float64Array::from(vec![
                    Some(-73.9),
                    Some(-75.0),
                    Some(-74.25),
                    Some(-73.50),
                    Some(-73.95),
                    None,
                ])) as ArrayRef,
            ),
            (
                "latitude",
                Arc::new(Float64Array::from(vec![
                    Some(40.7),
                    Some(40.7),
                    Some(40.5),
                    Some(41.2),
                    Some(41.3),
                    Some(40.7),
                ])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    fn ids(batch: &RecordBatch) -> Vec<i64> {
        batch
            .column_by_name("id")
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn test_price_filter_is_inclusive() {
        let filtered = filter_price(&listings(), PriceRange::new(10.0, 100.0)).unwrap();
        assert_eq!(ids(&filtered), vec![1, 3, 4]);
    }

    #[test]
    fn test_price_filter_drops_missing_and_text_prices() {
        let mask = price_mask(&listings(), PriceRange::new(f64::MIN, f64::MAX)).unwrap();
        assert_eq!(mask.null_count(), 0);
        assert!(!mask.value(4));
        assert!(!mask.value(5));
    }

    #[test]
    fn test_inverted_price_range_matches_nothing() {
        let filtered = filter_price(&listings(), PriceRange::new(100.0, 50.0)).unwrap();
        assert_eq!(filtered.num_rows(), 0);
        assert_eq!(filtered.num_columns(), 4);
    }

    #[test]
    fn test_bounding_box_is_inclusive() {
        let filtered = filter_bounding_box(&listings(), NYC_BOUNDING_BOX).unwrap();
        // 2 is west of the box, 5 north of it, 6 has no longitude
        assert_eq!(ids(&filtered), vec![1, 3, 4]);
    }

    #[test]
    fn test_bounding_box_contains() {
        assert!(NYC_BOUNDING_BOX.contains(-73.9, 40.7));
        assert!(!NYC_BOUNDING_BOX.contains(-75.0, 40.7));
        assert!(!NYC_BOUNDING_BOX.contains(-73.9, 40.49));
        assert!(!NYC_BOUNDING_BOX.contains(f64::NAN, 40.7));
    }

    #[test]
    fn test_missing_price_column() {
        let batch = RecordBatch::try_from_iter(vec![(
            "id",
            Arc::new(Int64Array::from(vec![1])) as ArrayRef,
        )])
        .unwrap();
        assert!(matches!(
            price_mask(&batch, PriceRange::new(0.0, 1.0)),
            Err(CleaningError::Schema(_))
        ));
    }
}
