// src/resolver/source.rs

//! Classification of dependency sources
//!
//! The `repository` field of a dependency is sniffed exactly once, here,
//! into a [`Source`]; resolution dispatches on the variant afterwards.

use crate::chart::{Dependency, LOCAL_PATH_PREFIX};
use crate::error::Result;
use crate::reference::Reference;
use crate::repository::alias_name;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a dependency is resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A chart directory on the local filesystem
    Local { path: PathBuf },
    /// A repository with a cached index
    Indexed {
        /// Key looked up in the alias table
        key: String,
        /// Repository name given by an `@name` / `alias:name` form
        alias: Option<String>,
    },
}

impl Source {
    /// Classify a dependency's repository
    ///
    /// Relative `file://` paths are resolved against `chart_dir`, the
    /// directory of the chart declaring the dependency. Repository strings
    /// that are neither local, aliases nor URLs must be valid references.
    pub fn classify(dep: &Dependency, chart_dir: &Path) -> Result<Self> {
        let repository = dep.repository.as_str();

        if let Some(rest) = repository.strip_prefix(LOCAL_PATH_PREFIX) {
            return Ok(Source::Local {
                path: local_path(rest, chart_dir),
            });
        }

        if let Some(alias) = alias_name(repository) {
            return Ok(Source::Indexed {
                key: repository.to_string(),
                alias: Some(alias.to_string()),
            });
        }

        if repository.is_empty() || repository.contains("://") {
            return Ok(Source::Indexed {
                key: repository.to_string(),
                alias: None,
            });
        }

        let reference = Reference::parse(repository)?;
        if reference.has_tag() {
            debug!(
                "Ignoring tag {:?} in repository {:?} of '{}'; the version constraint decides",
                reference.tag, repository, dep.name
            );
        }
        Ok(Source::Indexed {
            key: reference.repository,
            alias: None,
        })
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Source::Local { .. })
    }
}

fn local_path(path: &str, chart_dir: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        chart_dir.join(path)
    }
}
