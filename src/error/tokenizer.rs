/// Tokenizer related errors
#[derive(thiserror::Error, Debug)]
pub enum TokenizerError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered while scanning a token
	#[error(transparent)]
	TokenError(#[from] TokenError),
}

/// A specific lexical error with the line number it occurred on.
#[derive(thiserror::Error, Debug)]
#[error("(LINE {line}) {kind}")]
pub struct TokenError {
	/// The line number where the error occurred.
	line: usize,
	/// The kind of lexical error.
	kind: TokenErrorKind,
}

impl TokenError {
	pub fn new(line: usize, kind: TokenErrorKind) -> Self { Self { line, kind } }
}

/// Kinds of lexical errors.
#[derive(Debug)]
pub enum TokenErrorKind {
	/// No token may begin with this character.
	InvalidCharacter(char),
	/// End of input was reached before the closing quote of a string constant.
	UnterminatedString,
	/// A newline appeared inside a string constant.
	NewLineInString,
	/// A `/*` comment was never closed; the line is that of the opening token.
	UnterminatedBlockComment,
}

impl std::fmt::Display for TokenErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use TokenErrorKind::*;
		match self {
			InvalidCharacter(c) => {
				write!(f, "Invalid token beginning with '{c}'")
			}
			UnterminatedString => {
				write!(f, "No terminating \" for string constant")
			}
			NewLineInString => {
				write!(f, "New line characters are not permitted in string constants")
			}
			UnterminatedBlockComment => {
				write!(f, "No matching ending comment token exists for the opening comment token on this line")
			}
		}
	}
}
