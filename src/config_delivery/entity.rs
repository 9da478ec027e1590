//! Configuration and label rows.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Configuration Type ==
/// Kind of configuration payload, stored by its numeric code.
///
/// Unknown codes are kept as-is so newer snapshots still round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationType(pub i32);

impl ConfigurationType {
    pub const UNSPECIFIED: Self = Self(0);
    pub const RB_ENROLLMENT: Self = Self(1);

    pub fn code(self) -> i32 {
        self.0
    }
}

impl From<i32> for ConfigurationType {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for ConfigurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UNSPECIFIED => f.write_str("TYPE_UNSPECIFIED"),
            Self::RB_ENROLLMENT => f.write_str("TYPE_RB_ENROLLMENT"),
            Self(code) => write!(f, "TYPE_{code}"),
        }
    }
}

// == Configuration Entity ==
/// One configuration record of a given type and version.
///
/// `config_row_id` is a single sequence across the whole table, so label rows
/// can reference it directly. `(configuration_type, version, id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEntity {
    pub config_row_id: i64,
    pub configuration_type: ConfigurationType,
    /// Non-negative; inserts reject anything else
    pub version: i64,
    pub id: String,
    /// Opaque encoded payload
    pub value: Vec<u8>,
}

impl ConfigurationEntity {
    pub fn new(
        config_row_id: i64,
        configuration_type: ConfigurationType,
        version: i64,
        id: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            config_row_id,
            configuration_type,
            version,
            id: id.into(),
            value: value.into(),
        }
    }
}

// == Label Entity ==
/// Tag attached to a configuration row; deleted with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelEntity {
    pub config_row_id: i64,
    pub label: String,
}

impl LabelEntity {
    pub fn new(config_row_id: i64, label: impl Into<String>) -> Self {
        Self {
            config_row_id,
            label: label.into(),
        }
    }
}
