// src/repository/index.rs

//! Cached repository index (`<name>-index.yaml`)
//!
//! ```yaml
//! apiVersion: v1
//! generated: 2024-01-15T10:30:00Z
//! entries:
//!   alpine:
//!     - name: alpine
//!       version: 0.2.0
//!       urls:
//!         - https://charts.example.com/alpine-0.2.0.tgz
//!       digest: 515c58e5f79d8b2913a10cb400ebb6fa9c77fe813287afbacf1a0b897cd78727
//! ```

use crate::error::{Error, Result};
use crate::version::{VersionConstraint, parse_version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// API version written into new index files
pub const INDEX_API_VERSION: &str = "v1";

/// One published version of a chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartVersion {
    pub name: String,
    pub version: String,

    /// Download locations; an entry without any is not installable
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

impl ChartVersion {
    pub fn new(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            urls: vec![url.into()],
            ..Default::default()
        }
    }

    /// Whether this entry can be chosen by resolution
    fn is_installable(&self) -> bool {
        !self.urls.is_empty() && parse_version(&self.version).is_ok()
    }
}

/// A repository index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile {
    #[serde(default)]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,

    #[serde(default)]
    pub entries: BTreeMap<String, Vec<ChartVersion>>,
}

impl IndexFile {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            api_version: INDEX_API_VERSION.to_string(),
            generated: None,
            entries: BTreeMap::new(),
        }
    }

    /// Load a cached index
    ///
    /// `name` is the repository the index belongs to and only appears in
    /// errors.
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::RepoIndexMissing {
                name: name.to_string(),
                reason: format!("{} does not exist", path.display()),
            });
        }

        let content = fs::read(path)?;
        let mut index: IndexFile =
            serde_yaml::from_slice(&content).map_err(|e| Error::RepoIndexInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if index.api_version.is_empty() {
            return Err(Error::RepoIndexInvalid {
                path: path.to_path_buf(),
                reason: "no API version specified".to_string(),
            });
        }

        index.sort_entries();
        debug!(
            "Loaded index '{}' with {} charts from {}",
            name,
            index.entries.len(),
            path.display()
        );
        Ok(index)
    }

    /// Write the index as YAML
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Add a chart version
    pub fn add(&mut self, version: ChartVersion) {
        self.entries
            .entry(version.name.clone())
            .or_default()
            .push(version);
    }

    /// Whether the index lists any version of `name`
    pub fn has(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|v| !v.is_empty())
    }

    /// All listed versions of `name`, newest first once sorted
    pub fn versions(&self, name: &str) -> &[ChartVersion] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sort every entry list newest first; unparsable versions sort last
    pub fn sort_entries(&mut self) {
        for versions in self.entries.values_mut() {
            versions.sort_by(|a, b| compare_desc(&a.version, &b.version));
        }
    }

    /// The highest installable version of `name` satisfying `constraint`
    pub fn best_match(&self, name: &str, constraint: &VersionConstraint) -> Option<&ChartVersion> {
        self.versions(name)
            .iter()
            .filter(|cv| cv.is_installable())
            .filter_map(|cv| parse_version(&cv.version).ok().map(|v| (v, cv)))
            .filter(|(v, _)| constraint.satisfies(v))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, cv)| cv)
    }
}

fn compare_desc(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
