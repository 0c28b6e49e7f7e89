pub mod parser;
pub mod resolver;
pub mod tokenizer;

/// CompileError is the top-level error type for a compilation run. The binary
/// wraps its `Display` output in the single diagnostic line
/// `COMPILATION ERROR: ... - ending compilation`.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// A lexical error encountered while scanning a token
	#[error(transparent)]
	TokenError(#[from] tokenizer::TokenError),
	/// A syntax or semantic error encountered while parsing
	#[error(transparent)]
	ParseError(#[from] parser::ParseError),
	/// A cross-file resolution failure, reported against the original reference site
	#[error(transparent)]
	ResolveError(#[from] resolver::ResolveError),
	/// The driver was pointed at a directory that does not exist
	#[error("No directory exists with the name \"{0}\"")]
	MissingDirectory(String),
	/// The driver was pointed at a directory without any source files
	#[error("Directory \"{0}\" does not contain any jack files")]
	NoSourceFiles(String),
}

impl From<tokenizer::TokenizerError> for CompileError {
	fn from(error: tokenizer::TokenizerError) -> Self {
		match error {
			tokenizer::TokenizerError::InternalError(e) => CompileError::InternalError(e),
			tokenizer::TokenizerError::TokenError(e) => CompileError::TokenError(e),
		}
	}
}

impl From<parser::ParserError> for CompileError {
	fn from(error: parser::ParserError) -> Self {
		match error {
			parser::ParserError::InternalError(e) => CompileError::InternalError(e),
			parser::ParserError::TokenError(e) => CompileError::TokenError(e),
			parser::ParserError::ParseError(e) => CompileError::ParseError(e),
		}
	}
}
