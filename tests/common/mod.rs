// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use chartdeps::Home;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the cached index written by [`setup_home`]
pub const INDEX_NAME: &str = "kubernetes-charts";

/// Repository URL the cached index stands for
pub const REPO_URL: &str = "http://example.com/charts";

const INDEX_YAML: &str = r#"apiVersion: v1
generated: 2024-01-15T10:30:00Z
entries:
  alpine:
    - name: alpine
      version: 0.1.0
      urls:
        - https://example.com/charts/alpine-0.1.0.tgz
    - name: alpine
      version: 0.2.0
      urls:
        - https://example.com/charts/alpine-0.2.0.tgz
  mariadb:
    - name: mariadb
      version: 4.3.1
      urls:
        - https://example.com/charts/mariadb-4.3.1.tgz
"#;

/// Create a home directory with one cached index holding alpine 0.1.0 and
/// 0.2.0 plus mariadb 4.3.1.
///
/// Returns (TempDir, Home) - keep the TempDir alive to prevent cleanup.
pub fn setup_home() -> (TempDir, Home) {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = Home::new(temp_dir.path().join("home"));

    fs::create_dir_all(home.cache()).unwrap();
    fs::write(home.cache_index(INDEX_NAME), INDEX_YAML).unwrap();

    fs::write(
        home.repository_file(),
        format!(
            "apiVersion: v1\nrepositories:\n  - name: {}\n    url: {}\n",
            INDEX_NAME, REPO_URL
        ),
    )
    .unwrap();

    (temp_dir, home)
}

/// Write a minimal chart directory and return its path
pub fn write_chart(parent: &Path, name: &str, version: &str, deps_yaml: &str) -> PathBuf {
    let dir = parent.join(name);
    fs::create_dir_all(dir.join("templates")).unwrap();

    let mut chartfile = format!("apiVersion: v1\nname: {}\nversion: {}\n", name, version);
    if !deps_yaml.is_empty() {
        chartfile.push_str("dependencies:\n");
        chartfile.push_str(deps_yaml);
    }
    fs::write(dir.join("Chart.yaml"), chartfile).unwrap();
    fs::write(dir.join("values.yaml"), "replicaCount: 1\n").unwrap();
    fs::write(
        dir.join("templates").join("deployment.yaml"),
        "kind: Deployment\n",
    )
    .unwrap();

    dir
}

/// Create a chart `app` next to a local chart `signtest` at 0.1.0
///
/// Returns (TempDir, app chart path).
pub fn setup_charts() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    write_chart(temp_dir.path(), "signtest", "0.1.0", "");
    let app = write_chart(temp_dir.path(), "app", "1.0.0", "");
    (temp_dir, app)
}
