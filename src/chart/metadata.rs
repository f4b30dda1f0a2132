// src/chart/metadata.rs

//! Chart manifest (`Chart.yaml`)

use crate::chart::dependency::Dependency;
use crate::error::{Error, Result};
use crate::version::parse_version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the chart manifest inside a chart directory
pub const CHARTFILE_NAME: &str = "Chart.yaml";

/// API version number for version 1 charts
pub const API_VERSION_V1: &str = "v1";

/// Contents of a chart manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Declared requirements, in manifest order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl Metadata {
    /// Create metadata with a name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            api_version: API_VERSION_V1.to_string(),
            ..Default::default()
        }
    }

    /// Load and validate a manifest file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        let metadata: Metadata = serde_yaml::from_slice(&content).map_err(|e| Error::InvalidChart {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        metadata.validate(path)?;
        Ok(metadata)
    }

    /// Check the fields every chart must carry
    pub fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: String| Error::InvalidChart {
            path: path.to_path_buf(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("chart.metadata.name is required".to_string()));
        }
        if self.version.is_empty() {
            return Err(invalid("chart.metadata.version is required".to_string()));
        }
        parse_version(&self.version)
            .map_err(|e| invalid(format!("version {:?} is invalid: {}", self.version, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_chartfile() {
        let yaml = r#"
apiVersion: v1
name: wordpress
version: 0.3.0
appVersion: "5.2"
dependencies:
  - name: mariadb
    version: ">=0.1.0"
    repository: https://charts.example.com
"#;
        let md: Metadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(md.name, "wordpress");
        assert_eq!(md.api_version, API_VERSION_V1);
        assert_eq!(md.app_version.as_deref(), Some("5.2"));
        assert_eq!(md.dependencies.len(), 1);
        assert_eq!(md.dependencies[0].version, ">=0.1.0");
    }

    #[test]
    fn test_from_file_validates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CHARTFILE_NAME);

        fs::write(&path, "name: broken\n").unwrap();
        assert!(matches!(
            Metadata::from_file(&path),
            Err(Error::InvalidChart { .. })
        ));

        fs::write(&path, "name: broken\nversion: not-semver\n").unwrap();
        assert!(Metadata::from_file(&path).is_err());

        fs::write(&path, [0xff, 0xfe, 0x00, 0x61]).unwrap();
        assert!(matches!(
            Metadata::from_file(&path),
            Err(Error::InvalidChart { .. })
        ));

        fs::write(&path, "name: fine\nversion: 1.0.0\n").unwrap();
        assert_eq!(Metadata::from_file(&path).unwrap().name, "fine");
    }
}
