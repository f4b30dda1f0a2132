// src/lib.rs

//! Chart dependency resolution
//!
//! Resolves the dependencies a chart declares into a lock of exact
//! versions, reproducibly and offline.
//!
//! # Architecture
//!
//! - References: `[host[:port]/]path[:tag]` source strings
//! - Charts: an arena tree of charts and their nested sub-charts
//! - Repositories: cached `<name>-index.yaml` files under a home directory
//! - Resolver: per-dependency version selection producing a [`Lock`]
//! - Requirement digests: `sha256:` over the canonical dependency list
//! - Hooks: an explicit, per-orchestrator lifecycle hook registry

pub mod chart;
mod error;
pub mod hash;
pub mod hooks;
pub mod reference;
pub mod repository;
pub mod resolver;
pub mod version;

pub use chart::{Chart, ChartId, ChartTree, Dependency, Lock, Metadata};
pub use error::{Error, Result};
pub use hash::hash_req;
pub use hooks::{Hook, HookRegistry, Phase};
pub use reference::Reference;
pub use repository::{Home, IndexFile, RepoFile};
pub use resolver::{Resolver, Source};
pub use version::VersionConstraint;
