use anyhow::Context;
use clap::{ArgAction, Parser};
use colored::*;
use directories::BaseDirs;
use serde::Serialize;
use tabular::{Row, Table};
use tracing::{debug, trace, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::ExitCode;

use whichprovides::{Provides, ProvidesConfig, Resolver};

static DEFAULT_CONFIG_FILE_PATH: &str = ".config/whichprovides/config.toml";

/// Find which installed OS package provides a file.
#[derive(Parser)]
#[clap(author, version = clap::crate_version!(), max_term_width = 100, about)]
struct Cli {
    /// Files to look up
    #[clap(required = true)]
    paths: Vec<PathBuf>,

    /// Path to custom config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Read the distro identity from this file instead of /etc/os-release
    #[clap(long, value_name = "FILE")]
    os_release: Option<PathBuf>,

    /// Append `?distro=<QUALIFIER>` to canonical ids
    #[clap(long, value_name = "QUALIFIER")]
    distro_qualifier: Option<String>,

    /// Print results as JSON
    #[clap(long)]
    json: bool,

    /// Increase logging level
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One line of `--json` output.
#[derive(Serialize)]
struct Report<'a> {
    path: Cow<'a, str>,
    provides: Option<&'a Provides>,
    canonical_id: Option<String>,
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let log_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to initialize logger")
}

fn load_config(cli: &Cli) -> anyhow::Result<ProvidesConfig> {
    let mut config = match &cli.config {
        Some(path) => ProvidesConfig::load_from(Some(path.as_path()), true)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let default_file = BaseDirs::new().map(|dir| dir.home_dir().join(DEFAULT_CONFIG_FILE_PATH));
            ProvidesConfig::load_from(default_file.as_deref(), false)
                .context("Failed to load config")?
        }
    };

    if let Some(os_release) = &cli.os_release {
        config.os_release_path = os_release.clone();
    }
    if let Some(qualifier) = &cli.distro_qualifier {
        config.distro_qualifier = Some(qualifier.clone());
    }
    trace!("{:?}", config);
    Ok(config)
}

fn print_table<R: whichprovides::CommandRunner>(
    resolver: &Resolver<R>,
    results: &[(PathBuf, Option<Provides>)],
) {
    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}");
    table.add_row(
        Row::new()
            .with_cell("PATH".bold())
            .with_cell("PACKAGE".bold())
            .with_cell("VERSION".bold())
            .with_cell("ID".bold()),
    );
    for (path, provides) in results {
        match provides {
            Some(p) => table.add_row(
                Row::new()
                    .with_cell(path.display())
                    .with_cell(p.package_name())
                    .with_cell(p.package_version())
                    .with_cell(resolver.canonical_id(p)),
            ),
            None => table.add_row(
                Row::new()
                    .with_cell(path.display())
                    .with_cell("unknown".red())
                    .with_cell("-")
                    .with_cell("-"),
            ),
        };
    }
    print!("{}", table);
}

fn print_json<R: whichprovides::CommandRunner>(
    resolver: &Resolver<R>,
    results: &[(PathBuf, Option<Provides>)],
) -> anyhow::Result<()> {
    let reports: Vec<Report<'_>> = results
        .iter()
        .map(|(path, provides)| Report {
            path: path.to_string_lossy(),
            provides: provides.as_ref(),
            canonical_id: provides.as_ref().map(|p| resolver.canonical_id(p)),
        })
        .collect();
    let json = serde_json::to_string_pretty(&reports).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

/// Returns whether every path was attributed to a package.
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    debug!("Argument parsing complete.");

    let config = load_config(&cli)?;
    let resolver = Resolver::system(config);

    let results: Vec<(PathBuf, Option<Provides>)> = cli
        .paths
        .iter()
        .map(|path| (path.clone(), resolver.resolve(path)))
        .collect();

    if cli.json {
        print_json(&resolver, &results)?;
    } else {
        print_table(&resolver, &results);
    }

    Ok(results.iter().all(|(_, provides)| provides.is_some()))
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
