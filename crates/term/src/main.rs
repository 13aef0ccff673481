//! Lively command line: offline views over recorded analysis results.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use lively_editor::config::{ConfigLoadReport, load_or_default};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose)?;

	let ConfigLoadReport { config, errors } = cli.config.as_deref().map(load_or_default).unwrap_or_default();
	for (path, error) in &errors {
		eprintln!("ignoring {}: {error}", path.display());
	}

	let output = match cli.command {
		Command::Blocks { source, result, uri } => commands::blocks(&source, &result, uri.as_deref(), &config)?,
		Command::Decorations { result, provisional } => commands::decorations(&result, !provisional, &config)?,
		Command::Inspect {
			result,
			uri,
			line,
			example,
			index,
		} => commands::inspect(&result, &uri, line - 1, &example, index)?,
	};
	print!("{output}");
	Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
	};
	let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
	tracing::subscriber::set_global_default(subscriber)?;
	Ok(())
}
