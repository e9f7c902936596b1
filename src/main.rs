//! Command-line entry point.
//!
//! Usage:
//!   payroll-sort [SOURCE] [DEST] [--config <FILE>] [--json]

use clap::{value_parser, Arg, ArgAction, Command};
use payroll_sort::utils::{LoggingConfig, DEFAULT_CONFIG_FILE};
use payroll_sort::{AppConfig, Transformer};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("payroll-sort")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sorts a semicolon-delimited payroll CSV by name and id into a comma-delimited CSV")
        .arg(
            Arg::new("source")
                .help("Semicolon-delimited input file; its first line is dropped")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("dest")
                .help("Comma-delimited output file, overwritten if present")
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file (default: payroll-sort.toml if present)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print a JSON run report on stdout")
                .action(ArgAction::SetTrue),
        )
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("payroll_sort={}", logging.level).parse()?);
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(Some(DEFAULT_CONFIG_FILE)),
    };
    if let Some(source) = matches.get_one::<PathBuf>("source") {
        config.paths.source_path = source.clone();
    }
    if let Some(dest) = matches.get_one::<PathBuf>("dest") {
        config.paths.dest_path = dest.clone();
    }

    init_tracing(&config.logging)?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let report = match Transformer::new(config.paths).run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(kind = %e.kind(), "{}", e);
            return Err(e.into());
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
