use crate::error::tokenizer::{TokenError, TokenizerError};

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// A lexical error surfaced while the parser pulled tokens
	#[error(transparent)]
	TokenError(#[from] TokenError),
	#[error(transparent)]
	ParseError(#[from] ParseError),
}

impl From<TokenizerError> for ParserError {
	fn from(error: TokenizerError) -> Self {
		match error {
			TokenizerError::InternalError(e) => ParserError::InternalError(e),
			TokenizerError::TokenError(e) => ParserError::TokenError(e),
		}
	}
}

/// A syntax or semantic error with the line and lexeme it was detected at.
#[derive(thiserror::Error, Debug)]
#[error("(LINE {line}) (AT TOKEN '{lexeme}') {kind}")]
pub struct ParseError {
	line:   usize,
	lexeme: String,
	kind:   ParseErrorKind,
}

impl ParseError {
	pub fn new(line: usize, lexeme: impl Into<String>, kind: ParseErrorKind) -> Self {
		Self { line, lexeme: lexeme.into(), kind }
	}
}

#[derive(Debug)]
pub enum ParseErrorKind {
	/// The grammar required a token the input did not supply.
	Expected(String),
	/// A class with this name has already been compiled in this run.
	DuplicateClass(String),
	/// The name is already declared in the same visibility bucket of this scope.
	Redeclaration(String),
	/// The identifier has no visible declaration.
	UnknownIdentifier(String),
	/// A value of one type appeared where an incompatible type is required.
	TypeMismatch { expected: String, found: String },
	/// A call supplied the wrong number of arguments.
	ArityMismatch { name: String, expected: usize, found: usize },
	/// A call supplied an argument of the wrong type.
	ArgumentMismatch { name: String, position: usize, expected: String, found: String },
	/// An array index expression must be an integer.
	InvalidArrayIndex(String),
	/// A method call was attempted through a variable of primitive type.
	PrimitiveReceiver { name: String, r#type: String },
	/// An integer constant does not fit the virtual machine's word.
	IntegerOutOfRange(String),
	/// Some path through a subroutine body fails to return.
	MissingReturn,
}

impl std::fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorKind::*;
		match self {
			Expected(what) => {
				write!(f, "Expected {what} at this position")
			}
			DuplicateClass(name) => {
				write!(f, "A class with the name '{name}' has already been defined")
			}
			Redeclaration(name) => {
				write!(f, "The name '{name}' has already been declared in this scope")
			}
			UnknownIdentifier(name) => {
				write!(f, "The identifier '{name}' has not been declared")
			}
			TypeMismatch { expected, found } => {
				write!(f, "Expected a value of type '{expected}' but found '{found}'")
			}
			ArityMismatch { name, expected, found } => {
				write!(f, "The subroutine '{name}' expects {expected} arguments but {found} were supplied")
			}
			ArgumentMismatch { name, position, expected, found } => {
				write!(f, "Argument {position} of '{name}' expects type '{expected}' but '{found}' was supplied")
			}
			InvalidArrayIndex(found) => {
				write!(f, "An array index must be an integer but this expression has type '{found}'")
			}
			PrimitiveReceiver { name, r#type } => {
				write!(f, "The variable '{name}' of primitive type '{}' cannot be the target of a call", r#type)
			}
			IntegerOutOfRange(lexeme) => {
				write!(f, "The integer constant '{lexeme}' does not fit in the virtual machine's word")
			}
			MissingReturn => {
				write!(f, "Not all code paths in this subroutine return")
			}
		}
	}
}
