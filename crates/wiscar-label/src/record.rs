//! The sample record consumed by the label.

use serde::{Deserialize, Serialize};

/// A physical sample or specimen, as supplied by the page composition
/// layer.
///
/// Only `name` is consumed by the label. The record is read-only input:
/// nothing in this crate creates, mutates, or persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Display string identifying the sample.
    pub name: String,
}

impl SampleRecord {
    /// Create a record with the given sample name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for SampleRecord {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_host_data_object() {
        let record: SampleRecord =
            serde_json::from_str(r#"{"name": "WA-221", "material": "sanidine"}"#).unwrap();
        assert_eq!(record, SampleRecord::new("WA-221"));
    }
}
