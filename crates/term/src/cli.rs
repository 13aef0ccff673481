//! CLI schema for the lively binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lively")]
#[command(about = "Replay and inspect recorded live analysis results")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (TOML). Defaults apply when omitted or unreadable.
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the example blocks of a source file with their annotations
	Blocks {
		/// Source file the result was computed for
		source: PathBuf,
		/// Recorded analysis or termination result (JSON)
		result: PathBuf,
		/// File URI to pick from the result (first file if omitted)
		#[arg(long)]
		uri: Option<String>,
	},
	/// Print the decoration plan for every file of a result
	Decorations {
		/// Recorded analysis or termination result (JSON)
		result: PathBuf,
		/// Treat the result as provisional (no "not reached" marking)
		#[arg(long)]
		provisional: bool,
	},
	/// Show one observed value in the object explorer
	Inspect {
		/// Recorded analysis or termination result (JSON)
		result: PathBuf,
		/// File URI the probe belongs to
		#[arg(long)]
		uri: String,
		/// Line number (1-indexed)
		#[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
		line: u32,
		/// Example name
		#[arg(long)]
		example: String,
		/// Observed value index (0-indexed)
		#[arg(long, default_value_t = 0)]
		index: usize,
	},
}
