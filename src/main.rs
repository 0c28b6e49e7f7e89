use clap::Parser;
use jackc::{cli::*, Compiler};

fn main() {
	env_logger::init();
	let mut compiler = Compiler::new();

	let result = match Cli::parse().mode {
		Mode::Dir { path, print } => compiler.run_directory(&path, print),
		Mode::File { path, print } => compiler.run_file(&path, print),
	};

	if let Err(e) = result {
		println!("COMPILATION ERROR: {e} - ending compilation");
		std::process::exit(1);
	}
}
