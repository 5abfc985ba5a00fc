// file: src/models/params.rs
// description: cleaning parameters supplied on the command line

use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

/// Inputs of one cleaning run. Recorded verbatim as the run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningParams {
    pub input_artifact: String,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
    pub min_price: f64,
    pub max_price: f64,
}

impl CleaningParams {
    /// Checks the naming fields. An inverted price range is legal and
    /// yields an empty table.
    pub fn validate(&self) -> Result<()> {
        Validator::validate_not_empty("input_artifact", &self.input_artifact)?;
        Validator::validate_artifact_name(&self.output_artifact)?;
        Validator::validate_not_empty("output_type", &self.output_type)?;
        Ok(())
    }

    pub fn has_inverted_price_range(&self) -> bool {
        Validator::is_inverted_range(self.min_price, self.max_price)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "input_artifact": self.input_artifact,
            "output_artifact": self.output_artifact,
            "output_type": self.output_type,
            "output_description": self.output_description,
            "min_price": self.min_price,
            "max_price": self.max_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CleaningParams {
        CleaningParams {
            input_artifact: "sample.csv:latest".to_string(),
            output_artifact: "clean_sample.csv".to_string(),
            output_type: "clean_sample".to_string(),
            output_description: "Data with outliers and null values removed".to_string(),
            min_price: 10.0,
            max_price: 350.0,
        }
    }

    #[test]
    fn test_valid_params() {
        assert!(params().validate().is_ok());
        assert!(!params().has_inverted_price_range());
    }

    #[test]
    fn test_output_artifact_must_be_a_plain_name() {
        let mut p = params();
        p.output_artifact = "out/clean.csv".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_inverted_range_is_not_an_error() {
        let mut p = params();
        p.min_price = 100.0;
        p.max_price = 50.0;
        assert!(p.validate().is_ok());
        assert!(p.has_inverted_price_range());
    }

    #[test]
    fn test_to_json() {
        let json = params().to_json();
        assert_eq!(json["input_artifact"], "sample.csv:latest");
        assert_eq!(json["min_price"], 10.0);
        assert_eq!(json["max_price"], 350.0);
    }
}
