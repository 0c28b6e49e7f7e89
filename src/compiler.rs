use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::Context;
use log::info;

use crate::{
	emitter::{Instruction, LabelAllocator},
	error::CompileError,
	parser::Parser,
	resolver::Resolver,
	symbols::{ScopeStack, SymbolKind},
};

/// One standard-library routine: qualified name, kind, return type,
/// parameter types. These are hand-authored signatures; the classes behind
/// them are provided by the target platform, never compiled in this run.
type BuiltinSignature = (&'static str, SymbolKind, &'static str, &'static [&'static str]);

const OS_LIBRARY: &[BuiltinSignature] = &[
	("Math.abs", SymbolKind::Function, "int", &["int"]),
	("Math.multiply", SymbolKind::Function, "int", &["int", "int"]),
	("Math.divide", SymbolKind::Function, "int", &["int", "int"]),
	("Math.min", SymbolKind::Function, "int", &["int", "int"]),
	("Math.max", SymbolKind::Function, "int", &["int", "int"]),
	("Math.sqrt", SymbolKind::Function, "int", &["int"]),
	("String.new", SymbolKind::Constructor, "String", &["int"]),
	("String.dispose", SymbolKind::Method, "void", &[]),
	("String.length", SymbolKind::Method, "int", &[]),
	("String.charAt", SymbolKind::Method, "char", &["int"]),
	("String.setCharAt", SymbolKind::Method, "void", &["int", "char"]),
	("String.appendChar", SymbolKind::Method, "String", &["char"]),
	("String.eraseLastChar", SymbolKind::Method, "void", &[]),
	("String.intValue", SymbolKind::Method, "int", &[]),
	("String.setInt", SymbolKind::Method, "void", &["int"]),
	("Array.new", SymbolKind::Function, "Array", &["int"]),
	("Array.dispose", SymbolKind::Method, "void", &[]),
	("Memory.peek", SymbolKind::Function, "int", &["int"]),
	("Memory.poke", SymbolKind::Function, "void", &["int", "int"]),
	("Memory.alloc", SymbolKind::Function, "any", &["int"]),
	("Memory.deAlloc", SymbolKind::Function, "void", &["any"]),
	("Screen.clearScreen", SymbolKind::Function, "void", &[]),
	("Screen.setColor", SymbolKind::Function, "void", &["boolean"]),
	("Screen.drawPixel", SymbolKind::Function, "void", &["int", "int"]),
	("Screen.drawLine", SymbolKind::Function, "void", &["int", "int", "int", "int"]),
	("Screen.drawRectangle", SymbolKind::Function, "void", &["int", "int", "int", "int"]),
	("Screen.drawCircle", SymbolKind::Function, "void", &["int", "int", "int"]),
	("Output.moveCursor", SymbolKind::Function, "void", &["int", "int"]),
	("Output.printChar", SymbolKind::Function, "void", &["char"]),
	("Output.printString", SymbolKind::Function, "void", &["String"]),
	("Output.printInt", SymbolKind::Function, "void", &["int"]),
	("Output.println", SymbolKind::Function, "void", &[]),
	("Output.backSpace", SymbolKind::Function, "void", &[]),
	("Keyboard.keyPressed", SymbolKind::Function, "char", &[]),
	("Keyboard.readChar", SymbolKind::Function, "char", &[]),
	("Keyboard.readLine", SymbolKind::Function, "String", &["String"]),
	("Keyboard.readInt", SymbolKind::Function, "int", &["String"]),
	("Sys.halt", SymbolKind::Function, "void", &[]),
	("Sys.error", SymbolKind::Function, "void", &["int"]),
	("Sys.wait", SymbolKind::Function, "void", &["int"]),
];

/// Drives a whole compilation run and owns the state every file shares: the
/// scope stack, the forward-reference work-list and the label numbering.
pub struct Compiler {
	scopes:   ScopeStack,
	resolver: Resolver,
	labels:   LabelAllocator,
}

impl Compiler {
	/// A compiler with the standard library signatures pre-registered, so
	/// user code may call them without their classes existing in the run.
	pub fn new() -> Self {
		let mut compiler =
			Self { scopes: ScopeStack::default(), resolver: Resolver::default(), labels: LabelAllocator::default() };
		for &(qualified_name, kind, return_type, parameter_types) in OS_LIBRARY {
			compiler.register_builtin_signature(qualified_name, kind, return_type, parameter_types);
		}
		compiler
	}

	/// Register one callable signature under its `Class.name` qualified name,
	/// creating the class scope on first use.
	pub fn register_builtin_signature(
		&mut self,
		qualified_name: &str,
		kind: SymbolKind,
		return_type: &str,
		parameter_types: &[&str],
	) {
		let Some((class_name, name)) = qualified_name.split_once('.') else { return };
		let parameters = parameter_types.iter().map(ToString::to_string).collect();
		self.scopes.add_callable_symbol_to(class_name, name, kind, return_type, parameters);
	}

	/// Compile one source file into its instruction stream.
	pub fn compile_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Instruction>, CompileError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path).context("Failed open source file")?;
		self.compile_source(&path.display().to_string(), &source)
	}

	/// Compile one file's source text. Classes compiled by earlier calls stay
	/// visible, and references to classes not compiled yet are deferred.
	pub fn compile_source(&mut self, file_name: &str, source: &str) -> Result<Vec<Instruction>, CompileError> {
		info!("Compiling {file_name}");
		Parser::new(file_name, source, &mut self.scopes, &mut self.resolver, &mut self.labels).compile()
	}

	/// The end-of-run check: every deferred reference must have met its
	/// definition by now.
	pub fn assert_all_resolved(&self) -> Result<(), CompileError> {
		self.resolver.assert_all_resolved().map_err(Into::into)
	}

	/// Compile every `.jack` file in a directory, producing one `.vm`
	/// artifact per input (or printing to stdout), then run the end-of-run
	/// resolution check.
	pub fn run_directory(&mut self, directory: impl AsRef<Path>, to_stdout: bool) -> Result<(), CompileError> {
		let directory = directory.as_ref();
		let entries = fs::read_dir(directory)
			.map_err(|_| CompileError::MissingDirectory(directory.display().to_string()))?;
		let mut sources: Vec<PathBuf> = entries
			.filter_map(Result::ok)
			.map(|entry| entry.path())
			.filter(|path| path.extension().is_some_and(|extension| extension == "jack"))
			.collect();
		sources.sort();
		if sources.is_empty() {
			return Err(CompileError::NoSourceFiles(directory.display().to_string()));
		}
		for path in sources {
			let instructions = self.compile_file(&path)?;
			self.write_output(&path, &instructions, to_stdout)?;
		}
		self.assert_all_resolved()
	}

	/// Compile a single file and run the end-of-run check against it alone.
	pub fn run_file(&mut self, path: impl AsRef<Path>, to_stdout: bool) -> Result<(), CompileError> {
		let path = path.as_ref();
		let instructions = self.compile_file(path)?;
		self.write_output(path, &instructions, to_stdout)?;
		self.assert_all_resolved()
	}

	fn write_output(&self, source: &Path, instructions: &[Instruction], to_stdout: bool) -> Result<(), CompileError> {
		if to_stdout {
			for instruction in instructions {
				println!("{instruction}");
			}
			return Ok(());
		}
		let output = source.with_extension("vm");
		let text: String = instructions.iter().map(|instruction| format!("{instruction}\n")).collect();
		fs::write(&output, text).context("Failed write output file")?;
		info!("Wrote {}", output.display());
		Ok(())
	}
}

impl Default for Compiler {
	fn default() -> Self { Self::new() }
}
