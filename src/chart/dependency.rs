// src/chart/dependency.rs

//! Declared chart dependencies
//!
//! The same record is used for declared requirements (where `version` is a
//! constraint) and for locked entries (where `version` is exact). Field
//! order and the omit-when-empty rules are part of the requirement digest,
//! see [`crate::hash::hash_req`].

use serde::{Deserialize, Serialize};

/// Prefix marking a repository as a path on the local filesystem
pub const LOCAL_PATH_PREFIX: &str = "file://";

/// A dependency on another chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the chart depended upon
    pub name: String,

    /// Version constraint when declared, exact version when locked
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Repository URL, `file://` path, or alias
    #[serde(default)]
    pub repository: String,

    /// Values path that enables or disables the dependency
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,

    /// Tags grouping dependencies for bulk enable/disable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Whether the dependency is enabled after conditions are evaluated
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Values imported from the child chart into the parent
    #[serde(
        default,
        rename = "import-values",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub import_values: Vec<serde_yaml::Value>,

    /// Name the dependency is installed under
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Dependency {
    /// Create a dependency with a name, version and repository
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            repository: repository.into(),
            ..Default::default()
        }
    }

    /// Whether the repository points at a local chart directory
    pub fn is_local(&self) -> bool {
        self.repository.starts_with(LOCAL_PATH_PREFIX)
    }

    /// A locked copy carrying only name, repository and the exact version
    pub fn locked(&self, version: impl Into<String>) -> Self {
        Self::new(self.name.clone(), version, self.repository.clone())
    }
}
