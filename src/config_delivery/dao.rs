//! Configuration DAO
//!
//! Versioned configuration rows and their labels. Lookups are always pinned
//! to a `(type, version)` pair; absence is an empty result, never an error.

use std::collections::BTreeSet;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::entity::{ConfigurationEntity, ConfigurationType, LabelEntity};
use super::record::VersionedConfiguration;
use crate::db::Database;
use crate::error::{Result, StoreError};

const ENTITY_COLUMNS: &str = "c.config_row_id, c.type, c.version, c.id, c.value";

// == Configuration DAO ==
#[derive(Debug, Clone)]
pub struct ConfigurationDao {
    db: Database,
}

impl ConfigurationDao {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // == Insert Snapshot ==
    /// Stores every record of `configuration` in one transaction.
    ///
    /// Each record gets the next row id after the current maximum. Records
    /// whose `(type, version, id)` already exists replace the old row, and the
    /// old row's labels go with it. Returns the number of records stored.
    ///
    /// A negative version is rejected with [`StoreError::InvalidVersion`].
    pub fn insert_configurations(&self, configuration: &VersionedConfiguration) -> Result<usize> {
        check_version(configuration.version)?;
        if configuration.records.is_empty() {
            debug!(
                "Snapshot for {} version {} has no records",
                configuration.configuration_type, configuration.version
            );
            return Ok(0);
        }

        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let mut next_row_id = last_config_row_id(&tx)?;
        let mut entities = Vec::with_capacity(configuration.records.len());
        let mut labels = Vec::new();
        for record in &configuration.records {
            next_row_id += 1;
            entities.push(ConfigurationEntity::new(
                next_row_id,
                configuration.configuration_type,
                configuration.version,
                record.id.clone(),
                record.value.clone(),
            ));
            labels.extend(
                record
                    .labels
                    .iter()
                    .map(|label| LabelEntity::new(next_row_id, label.clone())),
            );
        }
        insert_entities(&tx, &entities)?;
        insert_labels(&tx, &labels)?;
        tx.commit()?;

        info!(
            "Stored {} configuration records ({} labels) for {} version {}",
            entities.len(),
            labels.len(),
            configuration.configuration_type,
            configuration.version
        );
        Ok(entities.len())
    }

    // == Raw Inserts ==
    /// Inserts or replaces configuration rows as given, row ids included.
    pub fn insert_configuration_entities(&self, entities: &[ConfigurationEntity]) -> Result<()> {
        for entity in entities {
            check_version(entity.version)?;
        }
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        insert_entities(&tx, entities)?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts label rows; re-inserting an existing pair is a no-op.
    pub fn insert_label_entities(&self, labels: &[LabelEntity]) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        insert_labels(&tx, labels)?;
        tx.commit()?;
        Ok(())
    }

    // == Versions ==
    /// Highest row id in the table, 0 when empty.
    pub fn get_last_config_row_id(&self) -> Result<i64> {
        last_config_row_id(&self.db.lock())
    }

    /// Newest version stored for `configuration_type`.
    pub fn get_latest_version(&self, configuration_type: ConfigurationType) -> Result<Option<i64>> {
        let version = self.db.lock().query_row(
            "SELECT MAX(version) FROM configurations WHERE type = ?1",
            params![configuration_type.code()],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        Ok(version)
    }

    /// Every distinct version of `configuration_type`, newest first.
    pub fn get_all_versions(&self, configuration_type: ConfigurationType) -> Result<Vec<i64>> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT version FROM configurations WHERE type = ?1 ORDER BY version DESC",
        )?;
        let versions = stmt
            .query_map(params![configuration_type.code()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(versions)
    }

    // == Lookups ==
    pub fn get_configuration_entities(
        &self,
        configuration_type: ConfigurationType,
        version: i64,
    ) -> Result<Vec<ConfigurationEntity>> {
        let conn = self.db.lock();
        query_entities(
            &conn,
            &format!(
                "SELECT {ENTITY_COLUMNS} FROM configurations c
                 WHERE c.type = ?1 AND c.version = ?2
                 ORDER BY c.config_row_id"
            ),
            vec![Value::from(configuration_type.code()), Value::from(version)],
        )
    }

    pub fn get_configuration_entity_by_id(
        &self,
        configuration_type: ConfigurationType,
        version: i64,
        id: &str,
    ) -> Result<Option<ConfigurationEntity>> {
        let entity = self
            .db
            .lock()
            .query_row(
                &format!(
                    "SELECT {ENTITY_COLUMNS} FROM configurations c
                     WHERE c.type = ?1 AND c.version = ?2 AND c.id = ?3"
                ),
                params![configuration_type.code(), version, id],
                map_entity_row,
            )
            .optional()?;
        Ok(entity)
    }

    /// Entities carrying at least one of `labels`.
    pub fn get_configuration_entities_by_any_label<S: AsRef<str>>(
        &self,
        configuration_type: ConfigurationType,
        version: i64,
        labels: &[S],
    ) -> Result<Vec<ConfigurationEntity>> {
        let labels = distinct_labels(labels);
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.db.lock();
        query_entities(
            &conn,
            &format!(
                "SELECT DISTINCT {ENTITY_COLUMNS} FROM configurations c
                 INNER JOIN labels l ON c.config_row_id = l.config_row_id
                 WHERE c.type = ?1 AND c.version = ?2 AND l.label IN ({})
                 ORDER BY c.config_row_id",
                placeholders(3, labels.len())
            ),
            label_query_params(configuration_type, version, &labels),
        )
    }

    /// Entities carrying every one of `labels`.
    ///
    /// Duplicates in `labels` are ignored; the required match count is the
    /// number of distinct labels asked for.
    pub fn get_configuration_entities_by_all_labels<S: AsRef<str>>(
        &self,
        configuration_type: ConfigurationType,
        version: i64,
        labels: &[S],
    ) -> Result<Vec<ConfigurationEntity>> {
        let labels = distinct_labels(labels);
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let count_param = 3 + labels.len();
        let mut query_params = label_query_params(configuration_type, version, &labels);
        query_params.push(Value::from(labels.len() as i64));
        let conn = self.db.lock();
        query_entities(
            &conn,
            &format!(
                "SELECT {ENTITY_COLUMNS} FROM configurations c
                 INNER JOIN labels l ON c.config_row_id = l.config_row_id
                 WHERE c.type = ?1 AND c.version = ?2 AND l.label IN ({})
                 GROUP BY c.config_row_id
                 HAVING COUNT(DISTINCT l.label) = ?{count_param}
                 ORDER BY c.config_row_id",
                placeholders(3, labels.len())
            ),
            query_params,
        )
    }

    pub fn get_label_entities_by_config_row_id(
        &self,
        config_row_id: i64,
    ) -> Result<Vec<LabelEntity>> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT config_row_id, label FROM labels WHERE config_row_id = ?1 ORDER BY label",
        )?;
        let labels = stmt
            .query_map(params![config_row_id], |row| {
                Ok(LabelEntity {
                    config_row_id: row.get(0)?,
                    label: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(labels)
    }

    // == Counts ==
    pub fn get_configuration_entities_count(
        &self,
        configuration_type: ConfigurationType,
        version: i64,
    ) -> Result<u64> {
        let count: i64 = self.db.lock().query_row(
            "SELECT COUNT(*) FROM configurations WHERE type = ?1 AND version = ?2",
            params![configuration_type.code(), version],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    // == Delete ==
    /// Deletes every row of `configuration_type` at any of `versions`; their
    /// labels are removed by cascade. Returns the number of configuration rows
    /// deleted.
    pub fn delete_configuration_entities(
        &self,
        configuration_type: ConfigurationType,
        versions: &[i64],
    ) -> Result<usize> {
        if versions.is_empty() {
            return Ok(0);
        }
        let mut query_params = vec![Value::from(configuration_type.code())];
        query_params.extend(versions.iter().map(|v| Value::from(*v)));
        let removed = self.db.lock().execute(
            &format!(
                "DELETE FROM configurations WHERE type = ?1 AND version IN ({})",
                placeholders(2, versions.len())
            ),
            params_from_iter(query_params),
        )?;
        info!(
            "Deleted {} configuration rows for {} versions {:?}",
            removed, configuration_type, versions
        );
        Ok(removed)
    }
}

fn check_version(version: i64) -> Result<()> {
    if version < 0 {
        return Err(StoreError::InvalidVersion(version));
    }
    Ok(())
}

fn last_config_row_id(conn: &Connection) -> Result<i64> {
    let last = conn.query_row(
        "SELECT COALESCE(MAX(config_row_id), 0) FROM configurations",
        [],
        |row| row.get(0),
    )?;
    Ok(last)
}

fn insert_entities(conn: &Connection, entities: &[ConfigurationEntity]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO configurations (config_row_id, type, version, id, value)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for entity in entities {
        stmt.execute(params![
            entity.config_row_id,
            entity.configuration_type.code(),
            entity.version,
            entity.id,
            entity.value,
        ])?;
    }
    Ok(())
}

fn insert_labels(conn: &Connection, labels: &[LabelEntity]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO labels (config_row_id, label) VALUES (?1, ?2)",
    )?;
    for label in labels {
        stmt.execute(params![label.config_row_id, label.label])?;
    }
    Ok(())
}

fn query_entities(
    conn: &Connection,
    sql: &str,
    query_params: Vec<Value>,
) -> Result<Vec<ConfigurationEntity>> {
    let mut stmt = conn.prepare(sql)?;
    let entities = stmt
        .query_map(params_from_iter(query_params), map_entity_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entities)
}

fn map_entity_row(row: &Row<'_>) -> rusqlite::Result<ConfigurationEntity> {
    Ok(ConfigurationEntity {
        config_row_id: row.get(0)?,
        configuration_type: ConfigurationType(row.get(1)?),
        version: row.get(2)?,
        id: row.get(3)?,
        value: row.get(4)?,
    })
}

fn distinct_labels<S: AsRef<str>>(labels: &[S]) -> BTreeSet<&str> {
    labels.iter().map(AsRef::as_ref).collect()
}

fn label_query_params(
    configuration_type: ConfigurationType,
    version: i64,
    labels: &BTreeSet<&str>,
) -> Vec<Value> {
    let mut query_params = vec![Value::from(configuration_type.code()), Value::from(version)];
    query_params.extend(labels.iter().map(|label| Value::from(label.to_string())));
    query_params
}

/// `?start, ?start+1, ...` for `count` parameters.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
