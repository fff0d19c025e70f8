//! Declarative access-control records
//!
//! Per-feature, per-operation rules: who may perform the operation and
//! which checks apply. The records are data, not middleware - enforcement
//! is deliberately out of scope for this service; clients and future
//! middleware read the matrix through [`read`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four record operations rules can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Named checks an operation may require.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checks {
    #[serde(default)]
    pub login: bool,
    #[serde(default)]
    pub ip_address: bool,
    #[serde(default)]
    pub dual_factor: bool,
}

/// Rule for one operation on one feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationRule {
    /// Users allowed to perform the operation. Empty means unrestricted.
    #[serde(default)]
    pub user_list: Vec<String>,
    #[serde(default)]
    pub checks: Checks,
}

/// All rules for one feature, keyed by operation.
pub type FeatureRules = BTreeMap<Operation, OperationRule>;

/// The full access-control matrix, keyed by feature name.
pub type SecurityRecords = BTreeMap<String, FeatureRules>;

/// Feature name for the people-management endpoints.
pub const PEOPLE: &str = "people";

/// Read the access-control matrix.
///
/// Currently a static default; the records move to the document store once
/// an admin surface exists to edit them.
pub fn read() -> SecurityRecords {
    let mut people: FeatureRules = BTreeMap::new();
    people.insert(
        Operation::Create,
        OperationRule {
            user_list: vec!["ejc369@nyu.edu".to_string()],
            checks: Checks {
                login: true,
                ..Checks::default()
            },
        },
    );

    let mut records = SecurityRecords::new();
    records.insert(PEOPLE.to_string(), people);
    records
}
