// tests/chart_tree.rs

//! Integration tests for loading chart directories into a tree.

mod common;

use chartdeps::chart::{LOCKFILE_NAME, load_dir};
use chartdeps::{ChartTree, Error, Lock, hash_req};
use common::write_chart;
use std::fs;

#[test]
fn test_load_chart_with_subcharts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let app = write_chart(temp_dir.path(), "app", "1.0.0", "");
    let charts = app.join("charts");
    fs::create_dir_all(&charts).unwrap();
    let mariadb = write_chart(&charts, "mariadb", "4.3.1", "");
    fs::create_dir_all(mariadb.join("charts")).unwrap();
    write_chart(&mariadb.join("charts"), "common", "0.0.5", "");
    fs::write(charts.join("redis-1.0.0.tgz"), b"not unpacked").unwrap();

    let mut tree = ChartTree::new();
    let root = load_dir(&mut tree, &app).unwrap();

    assert_eq!(tree.len(), 3);
    assert!(tree.is_root(root));
    assert_eq!(tree.get(root).templates.len(), 1);

    let common = tree.find(root, "mariadb.common").unwrap();
    assert_eq!(tree.root(common), root);
    assert_eq!(tree.chart_path(common), "app.mariadb.common");
    assert_eq!(tree.chart_full_path(common), "app/charts/mariadb/charts/common");

    // A chart cannot be attached below its own descendant
    let mariadb = tree.find(root, "mariadb").unwrap();
    let err = tree.add_dependency(common, &[mariadb]).unwrap_err();
    assert!(matches!(err, Error::ChartCycle { .. }));
    assert_eq!(tree.parent(mariadb), Some(root));
}

#[test]
fn test_loaded_lock_matches_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    let app = write_chart(
        temp_dir.path(),
        "app",
        "1.0.0",
        "  - name: alpine\n    version: 0.1.0\n    repository: http://example.com/charts\n",
    );

    let mut tree = ChartTree::new();
    let root = load_dir(&mut tree, &app).unwrap();
    assert!(tree.get(root).lock.is_none());

    let declared = tree.get(root).declared_dependencies().to_vec();
    let locked = declared.iter().map(|d| d.locked("0.1.0")).collect();
    Lock::new(hash_req(&declared).unwrap(), locked)
        .write_to_file(&app.join(LOCKFILE_NAME))
        .unwrap();

    let mut tree = ChartTree::new();
    let root = load_dir(&mut tree, &app).unwrap();
    let chart = tree.get(root);
    let lock = chart.lock.as_ref().unwrap();
    lock.verify(chart.declared_dependencies()).unwrap();

    // The lock file is not kept as a plain chart file
    assert!(chart.files.iter().all(|f| f.name != LOCKFILE_NAME));
}
