// file: src/cleaning/mod.rs
// description: row filters and column normalization applied by the cleaner
// reference: internal module structure

pub mod dates;
pub mod filters;

pub use dates::{DateNormalization, normalize_dates, parse_date};
pub use filters::{
    BoundingBox, NYC_BOUNDING_BOX, PriceRange, apply_mask, filter_bounding_box, filter_price,
    geo_mask, price_mask,
};
