use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jackc", about = "A single-pass compiler from Jack source to stack-machine instructions")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile every .jack file in a directory, one .vm file per input
	Dir {
		path:  PathBuf,
		/// Print instructions to stdout instead of writing .vm files
		#[arg(long)]
		print: bool,
	},
	/// Compile a single file
	File {
		path:  PathBuf,
		/// Print instructions to stdout instead of writing a .vm file
		#[arg(long)]
		print: bool,
	},
}
