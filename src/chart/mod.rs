// src/chart/mod.rs

//! Chart tree model
//!
//! A chart owns zero or more sub-charts. All charts of one tree live in a
//! [`ChartTree`] arena and are addressed by [`ChartId`] handles; each node
//! records its owner as a plain handle used only for upward navigation
//! (root lookup, path computation).
//!
//! # Invariants
//!
//! - A chart is never its own ancestor. [`ChartTree::add_dependency`]
//!   rejects any attachment that would close a cycle, so walking parent
//!   links always terminates at a root.
//! - A chart has at most one owner. Attaching a chart to a new owner
//!   detaches it from the previous owner's dependency list first.

mod dependency;
pub mod loader;
mod lock;
mod metadata;

pub use dependency::{Dependency, LOCAL_PATH_PREFIX};
pub use loader::load_dir;
pub use lock::{Lock, LEGACY_LOCKFILE_NAME, LOCKFILE_NAME};
pub use metadata::{Metadata, API_VERSION_V1, CHARTFILE_NAME};

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Default configuration values of a chart
pub type Values = BTreeMap<String, serde_yaml::Value>;

/// A named content blob inside a chart (template or miscellaneous file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path relative to the chart root
    pub name: String,
    pub data: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A chart: metadata, default values, templates and files
#[derive(Debug, Clone, Default)]
pub struct Chart {
    /// Contents of `Chart.yaml`
    pub metadata: Option<Metadata>,
    /// Contents of `Chart.lock`
    pub lock: Option<Lock>,
    pub templates: Vec<File>,
    /// Unparsed `values.yaml`
    pub raw_values: Vec<u8>,
    pub values: Values,
    /// Miscellaneous files, e.g. README, LICENSE
    pub files: Vec<File>,
}

impl Chart {
    /// Create a chart with the given metadata and nothing else
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..Default::default()
        }
    }

    /// The chart name, or "" when there is no metadata
    pub fn name(&self) -> &str {
        self.metadata.as_ref().map_or("", |m| m.name.as_str())
    }

    /// Declared dependencies from the metadata
    pub fn declared_dependencies(&self) -> &[Dependency] {
        self.metadata
            .as_ref()
            .map(|m| m.dependencies.as_slice())
            .unwrap_or(&[])
    }
}

/// Handle to a chart inside a [`ChartTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(usize);

#[derive(Debug)]
struct Node {
    chart: Chart,
    parent: Option<ChartId>,
    dependencies: Vec<ChartId>,
}

/// Arena holding a chart and its nested sub-charts
///
/// Handles are only meaningful for the tree that issued them; passing a
/// handle from another tree panics or addresses an unrelated chart.
#[derive(Debug, Default)]
pub struct ChartTree {
    nodes: Vec<Node>,
}

impl ChartTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a detached chart; it is a root until attached somewhere
    pub fn insert(&mut self, chart: Chart) -> ChartId {
        self.nodes.push(Node {
            chart,
            parent: None,
            dependencies: Vec::new(),
        });
        ChartId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ChartId) -> &Chart {
        &self.nodes[id.0].chart
    }

    /// Drop every chart inserted after the tree held `len` charts
    ///
    /// Only valid when no chart below `len` links to a dropped one.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// The chart name, or "" when there is no metadata
    pub fn name(&self, id: ChartId) -> &str {
        self.get(id).name()
    }

    /// Sub-charts of a chart, in attachment order
    pub fn dependencies(&self, id: ChartId) -> &[ChartId] {
        &self.nodes[id.0].dependencies
    }

    pub fn parent(&self, id: ChartId) -> Option<ChartId> {
        self.nodes[id.0].parent
    }

    pub fn is_root(&self, id: ChartId) -> bool {
        self.parent(id).is_none()
    }

    /// Walk parent links up to the root chart
    pub fn root(&self, id: ChartId) -> ChartId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The chart and its ancestors, nearest first
    pub fn ancestors(&self, id: ChartId) -> impl Iterator<Item = ChartId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Attach sub-charts to `owner`, appending them to its dependency list
    ///
    /// A child already owned elsewhere is detached from that owner first.
    /// Nothing is attached if any child is `owner` itself or one of its
    /// ancestors.
    pub fn add_dependency(&mut self, owner: ChartId, children: &[ChartId]) -> Result<()> {
        self.check_acyclic(owner, children)?;

        for &child in children {
            self.detach(child);
            self.nodes[owner.0].dependencies.push(child);
            self.nodes[child.0].parent = Some(owner);
        }
        Ok(())
    }

    /// Replace the sub-charts of `owner`
    ///
    /// Previous sub-charts not in `children` become roots.
    pub fn set_dependencies(&mut self, owner: ChartId, children: &[ChartId]) -> Result<()> {
        self.check_acyclic(owner, children)?;

        for old in std::mem::take(&mut self.nodes[owner.0].dependencies) {
            self.nodes[old.0].parent = None;
        }
        self.add_dependency(owner, children)
    }

    /// Reject children that are `owner` itself or one of its ancestors
    fn check_acyclic(&self, owner: ChartId, children: &[ChartId]) -> Result<()> {
        match children
            .iter()
            .find(|&&child| self.ancestors(owner).any(|a| a == child))
        {
            Some(&child) => Err(Error::ChartCycle {
                parent: self.chart_path(owner),
                child: self.name(child).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Remove a chart from its owner's dependency list, making it a root
    pub fn detach(&mut self, id: ChartId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].dependencies.retain(|&d| d != id);
        }
    }

    /// Full path in dot notation, e.g. `parent.child.grandchild`
    pub fn chart_path(&self, id: ChartId) -> String {
        self.path_with(id, ".")
    }

    /// Full path as laid out in an archive, e.g. `parent/charts/child`
    pub fn chart_full_path(&self, id: ChartId) -> String {
        self.path_with(id, "/charts/")
    }

    fn path_with(&self, id: ChartId, separator: &str) -> String {
        let mut names: Vec<&str> = self.ancestors(id).map(|a| self.name(a)).collect();
        names.reverse();
        names.join(separator)
    }

    /// Find a nested sub-chart by dotted path relative to `from`
    ///
    /// `find(root, "mariadb.common")` returns the `common` sub-chart of the
    /// `mariadb` sub-chart of `root`. An empty path returns `from`.
    pub fn find(&self, from: ChartId, path: &str) -> Option<ChartId> {
        if path.is_empty() {
            return Some(from);
        }
        path.split('.').try_fold(from, |current, name| {
            self.dependencies(current)
                .iter()
                .copied()
                .find(|&d| self.name(d) == name)
        })
    }
}
