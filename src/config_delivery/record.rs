//! Delivered configuration snapshots.
//!
//! A snapshot carries every record of one configuration type at one version.
//! Sync jobs receive it as JSON and hand it to
//! [`ConfigurationDao::insert_configurations`](super::ConfigurationDao::insert_configurations).

use serde::{Deserialize, Serialize};

use super::entity::ConfigurationType;
use crate::error::Result;

/// One record inside a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Opaque encoded payload
    #[serde(default)]
    pub value: Vec<u8>,
}

impl ConfigurationRecord {
    pub fn new(id: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            value: value.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// All records of one configuration type at one version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedConfiguration {
    pub version: i64,
    #[serde(default)]
    pub configuration_type: ConfigurationType,
    #[serde(default)]
    pub records: Vec<ConfigurationRecord>,
}

impl VersionedConfiguration {
    pub fn new(version: i64, configuration_type: ConfigurationType) -> Self {
        Self {
            version,
            configuration_type,
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: ConfigurationRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Decodes a snapshot delivered as JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
