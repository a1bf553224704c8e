use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Sample values bundled with the binary.
static BUNDLED_JSON: &str = include_str!("../data/data.json");

/// Read-only lists the generator samples from.
///
/// Every list is optional in the source document; a missing list
/// deserializes as empty and makes the fields that depend on it `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub first_names: Vec<String>,
    pub middle_names: Vec<String>,
    pub last_names: Vec<String>,
    pub streets: Vec<String>,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub routing_numbers: Vec<String>,
    pub drivers_license_numbers: Vec<String>,
    pub certificate_numbers: Vec<String>,
}

impl ReferenceData {
    /// The dataset shipped in `data/data.json`.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_has_every_list() {
        let data = ReferenceData::bundled().unwrap();
        assert!(!data.first_names.is_empty());
        assert!(!data.middle_names.is_empty());
        assert!(!data.last_names.is_empty());
        assert!(!data.streets.is_empty());
        assert!(!data.cities.is_empty());
        assert!(!data.states.is_empty());
        assert!(!data.routing_numbers.is_empty());
        assert!(!data.drivers_license_numbers.is_empty());
        assert!(!data.certificate_numbers.is_empty());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let data = ReferenceData::from_json(r#"{"firstNames": ["Ada"]}"#).unwrap();
        assert_eq!(data.first_names, vec!["Ada".to_string()]);
        assert!(data.last_names.is_empty());
        assert!(data.routing_numbers.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ReferenceData::from_json("{\"firstNames\": 3}").unwrap_err();
        assert!(matches!(err, crate::Error::JsonError(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ReferenceData::from_path("/nonexistent/formfill/data.json").unwrap_err();
        assert!(matches!(err, crate::Error::IoError(_)));
    }
}
