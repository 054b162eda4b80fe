use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity and concurrency metadata carried by every namespaced object.
///
/// Flattened into the object body, so a quota serializes as
/// `{"name": "...", "namespace": "...", "resource_version": "...", "hard": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Opaque version token assigned by the server. Empty means "never observed".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fields addressable by a field selector.
    pub fn fields(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("metadata.name".to_string(), self.name.clone()),
            ("metadata.namespace".to_string(), self.namespace.clone()),
        ])
    }
}
