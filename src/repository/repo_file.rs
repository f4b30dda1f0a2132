// src/repository/repo_file.rs

//! Configured repositories (`repositories.yaml`)
//!
//! Maps repository names to URLs. Resolution needs the reverse: given the
//! `repository` field of a dependency (a URL or an `@name` / `alias:name`
//! alias), find the name whose cached index should be searched.

use crate::chart::Dependency;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A configured repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub url: String,
}

/// Contents of `repositories.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFile {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub repositories: Vec<RepoEntry>,
}

/// Strip an `@name` or `alias:name` prefix, returning the alias name
pub fn alias_name(repository: &str) -> Option<&str> {
    repository
        .strip_prefix('@')
        .or_else(|| repository.strip_prefix("alias:"))
        .filter(|name| !name.is_empty())
}

impl RepoFile {
    /// Load the repository file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!("invalid repository file {}: {}", path.display(), e))
        })
    }

    /// Load the repository file, treating a missing file as empty
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!("No repository file at {}", path.display());
            Ok(Self::default())
        }
    }

    /// Write the repository file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Add or replace a repository by name
    pub fn add(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let entry = RepoEntry {
            name: name.into(),
            url: url.into(),
        };
        self.repositories.retain(|r| r.name != entry.name);
        self.repositories.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&RepoEntry> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Find a repository by URL, ignoring trailing slashes
    pub fn find_by_url(&self, url: &str) -> Option<&RepoEntry> {
        let wanted = url.trim_end_matches('/');
        self.repositories
            .iter()
            .find(|r| r.url.trim_end_matches('/') == wanted)
    }

    /// Build the alias table for a dependency list
    ///
    /// Keys are `repository` strings exactly as declared, values are the
    /// repository names whose cached indexes resolve them. Local
    /// dependencies are skipped; dependencies whose repository is not
    /// configured are left out and fail later at resolution.
    pub fn alias_table(&self, deps: &[Dependency]) -> HashMap<String, String> {
        let mut table = HashMap::new();

        for dep in deps.iter().filter(|d| !d.is_local()) {
            let entry = match alias_name(&dep.repository) {
                Some(alias) => self.get(alias),
                None => self.find_by_url(&dep.repository),
            };

            match entry {
                Some(entry) => {
                    table.insert(dep.repository.clone(), entry.name.clone());
                }
                None => warn!(
                    "Repository {:?} for dependency '{}' is not configured",
                    dep.repository, dep.name
                ),
            }
        }

        table
    }
}
