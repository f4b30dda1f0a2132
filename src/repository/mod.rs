// src/repository/mod.rs

//! Chart repositories as seen from the local machine
//!
//! This module provides:
//! - The home directory layout holding configuration and the index cache
//! - Cached index files and version selection within them
//! - The configured repository list used to build alias tables
//!
//! Fetching indexes from remote repositories is not done here; the cache is
//! read as-is.

mod home;
mod index;
mod repo_file;

pub use home::{HOME_ENV, Home};
pub use index::{ChartVersion, INDEX_API_VERSION, IndexFile};
pub use repo_file::{RepoEntry, RepoFile, alias_name};
