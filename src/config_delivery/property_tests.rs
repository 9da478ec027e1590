//! Property-Based Tests for Configuration Delivery
//!
//! Uses proptest to check version ordering and label filtering laws.

use proptest::prelude::*;

use crate::config_delivery::{
    ConfigurationDao, ConfigurationRecord, ConfigurationType, VersionedConfiguration,
};
use crate::db::Database;

const RB: ConfigurationType = ConfigurationType::RB_ENROLLMENT;

fn new_dao() -> ConfigurationDao {
    ConfigurationDao::new(Database::open_in_memory().unwrap())
}

fn snapshot(version: i64, labels: &[&str]) -> VersionedConfiguration {
    let record = labels
        .iter()
        .fold(ConfigurationRecord::new("id1", "value"), |record, label| {
            record.with_label(*label)
        });
    VersionedConfiguration::new(version, RB).with_record(record)
}

// == Strategies ==
/// Generates distinct versions in a random delivery order
fn shuffled_versions_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(0i64..1_000, 1..20)
        .prop_map(|versions| versions.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Generates label subsets of a small fixed vocabulary
fn labels_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(vec!["label1", "label2", "label3", "label4"], 0..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Versions come back newest first without duplicates, whatever the delivery order.
    #[test]
    fn prop_all_versions_descending(
        versions in shuffled_versions_strategy(),
        redeliver in any::<bool>()
    ) {
        let dao = new_dao();
        for version in &versions {
            dao.insert_configurations(&snapshot(*version, &["label1"])).unwrap();
            if redeliver {
                dao.insert_configurations(&snapshot(*version, &["label1"])).unwrap();
            }
        }

        let mut expected = versions.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(dao.get_all_versions(RB).unwrap(), expected.clone());
        prop_assert_eq!(dao.get_latest_version(RB).unwrap(), expected.first().copied());
    }

    // ALL matches exactly when the query is a non-empty subset of the record's labels;
    // ANY matches exactly when the two sets intersect.
    #[test]
    fn prop_label_filters(stored in labels_strategy(), query in labels_strategy()) {
        let dao = new_dao();
        dao.insert_configurations(&snapshot(1, &stored)).unwrap();

        let all_hit = !dao
            .get_configuration_entities_by_all_labels(RB, 1, query.as_slice())
            .unwrap()
            .is_empty();
        let any_hit = !dao
            .get_configuration_entities_by_any_label(RB, 1, query.as_slice())
            .unwrap()
            .is_empty();

        let subset = query.iter().all(|l| stored.contains(l));
        prop_assert_eq!(all_hit, !query.is_empty() && subset);
        prop_assert_eq!(any_hit, query.iter().any(|l| stored.contains(l)));
    }
}
