// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cleaning;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod table;
pub mod utils;

pub use cleaning::{BoundingBox, NYC_BOUNDING_BOX, PriceRange};
pub use config::{Config, OutputConfig, RunConfig, StoreBackend, StoreConfig};
pub use error::{CleaningError, Result};
pub use models::{
    ArtifactRecord, ArtifactRef, ArtifactVersion, CleaningParams, NewArtifact, RunRecord,
    RunStatus,
};
pub use pipeline::{Cleaner, CleaningReport, CleaningStats};
pub use store::{ArtifactStore, HttpArtifactStore, LocalArtifactStore, open_store};
pub use table::{CsvTableReader, CsvTableWriter};
pub use utils::{StepTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _store = open_store(&config.store).unwrap();
        assert!(NYC_BOUNDING_BOX.contains(-73.9, 40.7));
    }
}
