// src/chart/loader.rs

//! Loading charts from a directory
//!
//! Layout of a chart directory:
//!
//! ```text
//! mychart/
//!   Chart.yaml        manifest (required)
//!   values.yaml       default values
//!   Chart.lock        resolved dependencies (requirements.lock also read)
//!   templates/        template files
//!   charts/           unpacked sub-charts, one directory each
//!   ...               anything else is kept as a plain file
//! ```
//!
//! Packaged sub-charts (`charts/*.tgz`) are not unpacked here.

use crate::chart::lock::{LEGACY_LOCKFILE_NAME, LOCKFILE_NAME, Lock};
use crate::chart::metadata::{CHARTFILE_NAME, Metadata};
use crate::chart::{Chart, ChartId, ChartTree, File, Values};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default values file name
pub const VALUES_NAME: &str = "values.yaml";

const TEMPLATES_DIR: &str = "templates";
const CHARTS_DIR: &str = "charts";

/// Load a chart directory, and every unpacked sub-chart below it, into `tree`
///
/// Returns the handle of the chart at `dir`, which is a root of `tree`. On
/// error `tree` is left as it was, without any partially loaded chart.
pub fn load_dir(tree: &mut ChartTree, dir: &Path) -> Result<ChartId> {
    let start = tree.len();
    let result = load_into(tree, dir);
    if result.is_err() {
        tree.truncate(start);
    }
    result
}

fn load_into(tree: &mut ChartTree, dir: &Path) -> Result<ChartId> {
    let chartfile = dir.join(CHARTFILE_NAME);
    if !chartfile.is_file() {
        return Err(Error::InvalidChart {
            path: dir.to_path_buf(),
            reason: format!("{} file is missing", CHARTFILE_NAME),
        });
    }

    let mut chart = Chart::new(Metadata::from_file(&chartfile)?);
    debug!("Loading chart '{}' from {}", chart.name(), dir.display());

    let values_path = dir.join(VALUES_NAME);
    if values_path.is_file() {
        let raw = fs::read(&values_path)?;
        chart.values = parse_values(&raw).map_err(|reason| Error::InvalidChart {
            path: values_path.clone(),
            reason,
        })?;
        chart.raw_values = raw;
    }

    if let Some(lock_path) = Lock::find_in(dir) {
        chart.lock = Some(Lock::from_file(&lock_path)?);
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let hidden = e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.');
            let charts = e.depth() == 1 && e.file_name() == CHARTS_DIR;
            !hidden && !charts
        });

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = relative_name(dir, entry.path());
        if entry.depth() == 1 && is_reserved(&name) {
            continue;
        }

        let file = File::new(name, fs::read(entry.path())?);
        if file.name.starts_with(&format!("{}/", TEMPLATES_DIR)) {
            chart.templates.push(file);
        } else {
            chart.files.push(file);
        }
    }

    let id = tree.insert(chart);

    let charts_dir = dir.join(CHARTS_DIR);
    if charts_dir.is_dir() {
        let mut entries = fs::read_dir(&charts_dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        let mut subcharts = Vec::new();
        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                subcharts.push(load_into(tree, &path)?);
            } else if path.extension().is_some_and(|ext| ext == "tgz") {
                warn!("Skipping packaged sub-chart {}", path.display());
            }
        }
        tree.add_dependency(id, &subcharts)?;
    }

    Ok(id)
}

fn is_reserved(name: &str) -> bool {
    [CHARTFILE_NAME, VALUES_NAME, LOCKFILE_NAME, LEGACY_LOCKFILE_NAME].contains(&name)
}

/// Path relative to the chart root, always `/`-separated
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_values(raw: &[u8]) -> std::result::Result<Values, String> {
    if String::from_utf8_lossy(raw).trim().is_empty() {
        return Ok(Values::new());
    }
    let values: Option<Values> = serde_yaml::from_slice(raw).map_err(|e| e.to_string())?;
    Ok(values.unwrap_or_default())
}
