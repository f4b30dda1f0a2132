// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: chart home directory
fn home_arg() -> Arg {
    Arg::new("home")
        .long("home")
        .value_name("PATH")
        .help("Home directory holding repositories.yaml and the index cache")
}

/// Common argument: chart directory
fn chart_arg() -> Arg {
    Arg::new("chart")
        .default_value(".")
        .help("Path to the chart directory")
}

fn build_cli() -> Command {
    Command::new("chartdeps")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Chartdeps Contributors")
        .about("Resolve chart dependencies into reproducible locks")
        .subcommand_required(false)
        .subcommand(
            Command::new("resolve")
                .about("Resolve a chart's dependencies against the cached indexes")
                .arg(chart_arg())
                .arg(home_arg())
                .arg(
                    Arg::new("repo")
                        .long("repo")
                        .value_name("ALIAS=INDEX")
                        .action(clap::ArgAction::Append)
                        .help("Map a repository alias or chart name to a cached index"),
                )
                .arg(
                    Arg::new("write")
                        .short('w')
                        .long("write")
                        .action(clap::ArgAction::SetTrue)
                        .help("Write Chart.lock next to Chart.yaml"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether a chart's lock is stale")
                .arg(chart_arg()),
        )
        .subcommand(
            Command::new("hash")
                .about("Print the requirement digest of a chart")
                .arg(chart_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the chart and its nested sub-charts")
                .arg(chart_arg()),
        )
        .subcommand(
            Command::new("parse-ref")
                .about("Split a source reference into repository and tag")
                .arg(Arg::new("reference").required(true).help("Reference string")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("chartdeps.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
