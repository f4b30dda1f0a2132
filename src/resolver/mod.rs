// src/resolver/mod.rs

//! Dependency resolution
//!
//! Turns the declared dependencies of a chart into a [`Lock`] of exact
//! versions. Each dependency is resolved independently, in declared order:
//!
//! 1. The version constraint is parsed.
//! 2. The repository is classified into a [`Source`].
//! 3. Local sources are checked against the chart at the path; indexed
//!    sources are searched in the cached index for the highest version
//!    satisfying the constraint.
//!
//! Any failure aborts the whole resolution; a partial lock is never
//! returned. The lock digest is always recomputed from the declared list.

mod source;

pub use source::Source;

use crate::chart::{CHARTFILE_NAME, Dependency, Lock, Metadata};
use crate::error::{Error, Result};
use crate::hash::hash_req;
use crate::repository::{Home, IndexFile};
use crate::version::VersionConstraint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resolves the dependencies of one chart
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Directory of the chart whose dependencies are resolved
    chart_path: PathBuf,
    home: Home,
}

impl Resolver {
    /// Create a resolver for the chart at `chart_path`
    pub fn new(chart_path: impl Into<PathBuf>, home: Home) -> Self {
        Self {
            chart_path: chart_path.into(),
            home,
        }
    }

    /// Resolve `deps` into a lock
    ///
    /// `repo_names` maps repository strings (or, failing that, chart names)
    /// to the names of cached indexes. `digest` is the caller's digest of
    /// `deps`; it is only compared against the recomputed one.
    pub fn resolve(
        &self,
        deps: &[Dependency],
        repo_names: &HashMap<String, String>,
        digest: &str,
    ) -> Result<Lock> {
        info!(
            "Resolving {} dependencies for {}",
            deps.len(),
            self.chart_path.display()
        );

        let mut indexes: HashMap<String, IndexFile> = HashMap::new();
        let mut locked = Vec::with_capacity(deps.len());

        for dep in deps {
            let constraint =
                VersionConstraint::parse(&dep.version).map_err(|e| Error::InvalidConstraint {
                    name: dep.name.clone(),
                    constraint: dep.version.clone(),
                    reason: e.reason,
                })?;

            let version = match Source::classify(dep, &self.chart_path)? {
                Source::Local { path } => self.resolve_local(dep, &constraint, &path)?,
                Source::Indexed { key, alias } => {
                    let cache_name = index_name(dep, &key, alias.as_deref(), repo_names)?;
                    if !indexes.contains_key(&cache_name) {
                        let index = IndexFile::load(&cache_name, &self.home.cache_index(&cache_name))?;
                        indexes.insert(cache_name.clone(), index);
                    }
                    resolve_indexed(dep, &constraint, &indexes[&cache_name], &cache_name)?
                }
            };

            debug!("Locked '{}' {} at {}", dep.name, constraint, version);
            locked.push(dep.locked(version));
        }

        let computed = hash_req(deps)?;
        if !digest.is_empty() && digest != computed {
            warn!(
                "Supplied requirement digest {} is stale; using {}",
                digest, computed
            );
        }

        Ok(Lock::new(computed, locked))
    }

    /// Check a local chart directory against the constraint
    ///
    /// Returns the version declared by the local chart.
    fn resolve_local(
        &self,
        dep: &Dependency,
        constraint: &VersionConstraint,
        path: &Path,
    ) -> Result<String> {
        let not_found = |reason: String| Error::ChartNotFound {
            name: dep.name.clone(),
            repository: dep.repository.clone(),
            reason,
        };

        let chartfile = path.join(CHARTFILE_NAME);
        if !chartfile.is_file() {
            return Err(not_found(format!("directory {} not found", path.display())));
        }

        // Manifest loading has already validated the version
        let metadata = Metadata::from_file(&chartfile)?;
        if !constraint.satisfies_str(&metadata.version) {
            return Err(not_found(format!(
                "local chart version {} does not satisfy {}",
                metadata.version, constraint
            )));
        }

        Ok(metadata.version)
    }
}

/// Find the cached index name for an indexed dependency
///
/// Looked up by repository key, then by chart name; an explicit alias
/// falls back to its own name.
fn index_name(
    dep: &Dependency,
    key: &str,
    alias: Option<&str>,
    repo_names: &HashMap<String, String>,
) -> Result<String> {
    repo_names
        .get(key)
        .or_else(|| repo_names.get(&dep.name))
        .map(String::as_str)
        .or(alias)
        .map(str::to_string)
        .ok_or_else(|| Error::RepoIndexMissing {
            name: dep.repository.clone(),
            reason: format!("no repository configured for '{}'", dep.name),
        })
}

fn resolve_indexed(
    dep: &Dependency,
    constraint: &VersionConstraint,
    index: &IndexFile,
    cache_name: &str,
) -> Result<String> {
    if !index.has(&dep.name) {
        return Err(Error::ChartNotFound {
            name: dep.name.clone(),
            repository: dep.repository.clone(),
            reason: format!("not listed in index {:?}", cache_name),
        });
    }

    index
        .best_match(&dep.name, constraint)
        .map(|cv| cv.version.clone())
        .ok_or_else(|| Error::NoMatchingVersion {
            name: dep.name.clone(),
            repository: dep.repository.clone(),
            constraint: constraint.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_name_lookup_order() {
        let mut names = HashMap::new();
        names.insert("https://charts.example.com".to_string(), "stable".to_string());
        names.insert("alpine".to_string(), "kubernetes-charts".to_string());

        let dep = Dependency::new("redis", "1.0.0", "https://charts.example.com");
        assert_eq!(index_name(&dep, &dep.repository, None, &names).unwrap(), "stable");

        let dep = Dependency::new("alpine", "1.0.0", "http://example.com");
        assert_eq!(
            index_name(&dep, &dep.repository, None, &names).unwrap(),
            "kubernetes-charts"
        );

        let dep = Dependency::new("kafka", "1.0.0", "@incubator");
        assert_eq!(
            index_name(&dep, &dep.repository, Some("incubator"), &names).unwrap(),
            "incubator"
        );

        let dep = Dependency::new("oedipus-rex", "1.0.0", "http://example.com");
        assert!(matches!(
            index_name(&dep, &dep.repository, None, &names),
            Err(Error::RepoIndexMissing { .. })
        ));
    }
}
