// src/repository/home.rs

//! Home directory layout
//!
//! ```text
//! $CHARTDEPS_HOME/
//!   repository/
//!     repositories.yaml          configured repositories (name, url)
//!     cache/
//!       <name>-index.yaml        cached index per repository
//! ```
//!
//! The cache is populated by whatever fetches indexes; this crate only
//! reads it.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "CHARTDEPS_HOME";

/// Directory name used under the user's home when no override is set
const DEFAULT_HOME_DIR: &str = ".chartdeps";

/// Paths under the chartdeps home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Home {
    root: PathBuf,
}

impl Home {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the home from `CHARTDEPS_HOME`, falling back to `~/.chartdeps`
    pub fn from_env() -> Result<Self> {
        if let Some(root) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(root));
        }
        dirs::home_dir()
            .map(|home| Self::new(home.join(DEFAULT_HOME_DIR)))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "cannot determine home directory; set {}",
                    HOME_ENV
                ))
            })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn repository(&self) -> PathBuf {
        self.root.join("repository")
    }

    /// `repositories.yaml`
    pub fn repository_file(&self) -> PathBuf {
        self.repository().join("repositories.yaml")
    }

    pub fn cache(&self) -> PathBuf {
        self.repository().join("cache")
    }

    /// Cached index file for a repository name
    pub fn cache_index(&self, name: &str) -> PathBuf {
        self.cache().join(format!("{}-index.yaml", name))
    }
}
