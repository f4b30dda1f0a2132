// src/chart/lock.rs

//! Chart lock (`Chart.lock`)
//!
//! The lock captures the exact resolved version of every declared
//! dependency, enabling reproducible installs across machines and times.
//!
//! # Format
//!
//! ```yaml
//! generated: 2024-01-15T10:30:00Z
//! digest: sha256:d661820b01ed7bcf26eed8f01cf16380e0a76326ba33058d3150f919d9b15bc0
//! dependencies:
//!   - name: alpine
//!     version: 0.2.0
//!     repository: http://localhost:8879/charts
//! ```
//!
//! `digest` is the requirement digest of the *declared* dependency list
//! (see [`crate::hash::hash_req`]). A lock whose digest differs from the
//! digest of the current declarations is stale. `generated` is recorded for
//! people reading the file and plays no part in that check.

use crate::chart::dependency::Dependency;
use crate::error::{Error, Result};
use crate::hash::{hash_req, is_digest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Lock file name written next to `Chart.yaml`
pub const LOCKFILE_NAME: &str = "Chart.lock";

/// Older lock file name, accepted when reading
pub const LEGACY_LOCKFILE_NAME: &str = "requirements.lock";

/// Resolved dependencies of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    /// When the lock was generated
    pub generated: DateTime<Utc>,

    /// Requirement digest of the declared dependency list
    pub digest: String,

    /// Resolved dependencies, in declared order
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Lock {
    /// Create a lock stamped with the current time
    pub fn new(digest: impl Into<String>, dependencies: Vec<Dependency>) -> Self {
        Self {
            generated: Utc::now(),
            digest: digest.into(),
            dependencies,
        }
    }

    /// Load a lock from a path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a lock from YAML, validating the digest format
    pub fn parse(content: &str) -> Result<Self> {
        let lock: Lock = serde_yaml::from_str(content)?;
        if !is_digest(&lock.digest) {
            return Err(Error::ParseError(format!(
                "lock digest {:?} is not a sha256 digest",
                lock.digest
            )));
        }
        Ok(lock)
    }

    /// Find the lock file in a chart directory, preferring `Chart.lock`
    pub fn find_in(chart_dir: &Path) -> Option<PathBuf> {
        [LOCKFILE_NAME, LEGACY_LOCKFILE_NAME]
            .iter()
            .map(|name| chart_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the lock to a path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Get a locked dependency by name
    pub fn get_dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    /// Whether this lock was produced from a different requirement list
    pub fn is_stale(&self, declared: &[Dependency]) -> Result<bool> {
        Ok(hash_req(declared)? != self.digest)
    }

    /// Check that this lock matches the declared requirements
    ///
    /// Besides the digest, every declared dependency must have a locked
    /// entry with the same name and repository, in the same position.
    pub fn verify(&self, declared: &[Dependency]) -> Result<()> {
        if self.is_stale(declared)? {
            return Err(Error::StaleLock(
                "digest does not match the declared dependencies".to_string(),
            ));
        }
        if self.dependencies.len() != declared.len() {
            return Err(Error::StaleLock(format!(
                "lock has {} dependencies, {} declared",
                self.dependencies.len(),
                declared.len()
            )));
        }
        for (locked, wanted) in self.dependencies.iter().zip(declared) {
            if locked.name != wanted.name || locked.repository != wanted.repository {
                return Err(Error::StaleLock(format!(
                    "locked dependency {:?} ({}) does not match declared {:?} ({})",
                    locked.name, locked.repository, wanted.name, wanted.repository
                )));
            }
        }
        Ok(())
    }
}
