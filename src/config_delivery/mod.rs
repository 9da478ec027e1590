//! Configuration Delivery Module
//!
//! Versioned, label-tagged configuration snapshots with atomic batch insert
//! and cascade delete.

mod dao;
mod entity;
mod record;

#[cfg(test)]
mod property_tests;

pub use dao::ConfigurationDao;
pub use entity::{ConfigurationEntity, ConfigurationType, LabelEntity};
pub use record::{ConfigurationRecord, VersionedConfiguration};
