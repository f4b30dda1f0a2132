// src/main.rs

use anyhow::{Context, Result, bail};
use chartdeps::chart::{self, CHARTFILE_NAME, ChartId, ChartTree, LOCKFILE_NAME, Metadata};
use chartdeps::{Home, Reference, RepoFile, Resolver, hash_req};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "chartdeps")]
#[command(author, version, about = "Resolve chart dependencies into reproducible locks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a chart's dependencies against the cached indexes
    Resolve {
        /// Path to the chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,
        /// Home directory holding repositories.yaml and the index cache
        #[arg(long)]
        home: Option<PathBuf>,
        /// Map a repository alias or chart name to a cached index
        #[arg(long = "repo", value_name = "ALIAS=INDEX")]
        repos: Vec<String>,
        /// Write Chart.lock next to Chart.yaml
        #[arg(short, long)]
        write: bool,
    },
    /// Report whether a chart's lock is stale
    Check {
        /// Path to the chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,
    },
    /// Print the requirement digest of a chart
    Hash {
        /// Path to the chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,
    },
    /// Print the chart and its nested sub-charts
    Tree {
        /// Path to the chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,
    },
    /// Split a source reference into repository and tag
    ParseRef {
        /// Reference string
        reference: String,
    },
}

fn load_metadata(chart: &Path) -> Result<Metadata> {
    let path = chart.join(CHARTFILE_NAME);
    Metadata::from_file(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse `--repo ALIAS=INDEX` overrides
fn parse_repo_overrides(repos: &[String]) -> Result<HashMap<String, String>> {
    repos
        .iter()
        .map(|r| match r.split_once('=') {
            Some((alias, index)) if !alias.is_empty() && !index.is_empty() => {
                Ok((alias.to_string(), index.to_string()))
            }
            _ => bail!("Invalid --repo value {:?}: expected ALIAS=INDEX", r),
        })
        .collect()
}

fn cmd_resolve(chart: &Path, home: Option<PathBuf>, repos: &[String], write: bool) -> Result<()> {
    let metadata = load_metadata(chart)?;
    let home = match home {
        Some(path) => Home::new(path),
        None => Home::from_env()?,
    };

    let repo_file = RepoFile::load_or_default(&home.repository_file())?;
    let mut repo_names = repo_file.alias_table(&metadata.dependencies);
    repo_names.extend(parse_repo_overrides(repos)?);

    let digest = hash_req(&metadata.dependencies)?;
    let resolver = Resolver::new(chart, home);
    let lock = resolver
        .resolve(&metadata.dependencies, &repo_names, &digest)
        .with_context(|| format!("Failed to resolve dependencies of '{}'", metadata.name))?;

    if write {
        let path = chart.join(LOCKFILE_NAME);
        lock.write_to_file(&path)?;
        info!("Wrote {}", path.display());
        println!("Saved {}", path.display());
    } else {
        print!("{}", lock.to_yaml()?);
    }
    Ok(())
}

fn cmd_check(chart: &Path) -> Result<()> {
    let mut tree = ChartTree::new();
    let id = chart::load_dir(&mut tree, chart)?;
    let loaded = tree.get(id);

    let Some(lock) = &loaded.lock else {
        println!("{}: no lock file", loaded.name());
        return Ok(());
    };

    match lock.verify(loaded.declared_dependencies()) {
        Ok(()) => {
            println!("{}: lock is up to date", loaded.name());
            Ok(())
        }
        Err(e) => bail!("{}: {}", loaded.name(), e),
    }
}

fn print_tree(tree: &ChartTree, id: ChartId, depth: usize) {
    let chart = tree.get(id);
    let version = chart.metadata.as_ref().map_or("", |m| m.version.as_str());
    println!("{}{} {}", "  ".repeat(depth), chart.name(), version);
    for &child in tree.dependencies(id) {
        print_tree(tree, child, depth + 1);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve {
            chart,
            home,
            repos,
            write,
        }) => cmd_resolve(&chart, home, &repos, write),
        Some(Commands::Check { chart }) => cmd_check(&chart),
        Some(Commands::Hash { chart }) => {
            let metadata = load_metadata(&chart)?;
            println!("{}", hash_req(&metadata.dependencies)?);
            Ok(())
        }
        Some(Commands::Tree { chart }) => {
            let mut tree = ChartTree::new();
            let id = chart::load_dir(&mut tree, &chart)?;
            print_tree(&tree, id, 0);
            Ok(())
        }
        Some(Commands::ParseRef { reference }) => {
            let reference = Reference::parse(&reference)?;
            println!("repository: {}", reference.repository);
            println!("tag: {}", reference.tag);
            Ok(())
        }
        None => {
            println!("chartdeps v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'chartdeps --help' for usage information");
            Ok(())
        }
    }
}
