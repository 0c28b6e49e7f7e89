//! Lexical analysis.
//!
//! Tokens are produced on demand: the parser asks for one token at a time and
//! may peek a single token ahead. The peeked token is cached, so peeking and
//! then consuming scans the input only once, and tokenizing the same file
//! twice from scratch yields an identical token sequence.
//!
//! Whitespace and both comment forms are consumed transparently before every
//! token. Line counting happens during that consumption too, so a diagnostic
//! for a token after a long block comment still names the right line.

mod token;

pub use token::*;

use crate::error::tokenizer::{TokenError, TokenErrorKind, TokenizerError};

/// An on-demand tokenizer over one source file
pub struct Tokenizer<'a> {
	/// Full source text of the file
	source:      &'a str,
	/// User input source code iterator
	source_iter: std::iter::Peekable<std::str::CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// One past the last consumed character
	cursor:      usize,
	/// Tracks what source line the cursor is on
	line:        usize,
	/// One-token lookahead cache
	cached:      Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1, cached: None }
	}

	/// Consume and return the next token, advancing position.
	pub fn next_token(&mut self) -> Result<Token<'a>, TokenizerError> {
		if let Some(token) = self.cached.take() {
			return Ok(token);
		}
		self.scan_token()
	}

	/// Return the next token without consuming it. A following `next_token`
	/// returns the cached value without re-scanning.
	pub fn peek_token(&mut self) -> Result<Token<'a>, TokenizerError> {
		if let Some(token) = &self.cached {
			return Ok(token.clone());
		}
		let token = self.scan_token()?;
		self.cached = Some(token.clone());
		Ok(token)
	}

	fn scan_token(&mut self) -> Result<Token<'a>, TokenizerError> {
		self.consume_trivia()?;

		let Some(&(index, next_char)) = self.source_iter.peek() else {
			return Ok(Token::new(TokenKind::Eof, "", self.line));
		};
		self.start = index;
		self.cursor = index;

		if next_char.is_ascii_alphabetic() || next_char == '_' {
			return Ok(self.identifier_or_keyword());
		}
		if next_char.is_ascii_digit() {
			return Ok(self.integer_constant());
		}
		if next_char == '"' {
			return self.string_constant();
		}
		if SYMBOLS.contains(&next_char) {
			self.advance();
			return Ok(Token::new(TokenKind::Symbol, &self.source[self.start..self.cursor], self.line));
		}

		Err(TokenError::new(self.line, TokenErrorKind::InvalidCharacter(next_char)).into())
	}

	/// Skip whitespace and comments, counting every newline consumed.
	fn consume_trivia(&mut self) -> Result<(), TokenizerError> {
		loop {
			match self.peek() {
				Some(c) if c.is_whitespace() => {
					if c == '\n' {
						self.line += 1;
					}
					self.advance();
				}
				Some('/') if self.peek_second() == Some('/') => {
					while self.peek().is_some_and(|c| c != '\n') {
						self.advance();
					}
				}
				Some('/') if self.peek_second() == Some('*') => {
					let opening_line = self.line;
					self.advance(); // consume '/'
					self.advance(); // consume '*'
					let mut closed = false;
					while let Some(c) = self.peek() {
						if c == '*' && self.peek_second() == Some('/') {
							self.advance(); // consume '*'
							self.advance(); // consume '/'
							closed = true;
							break;
						}
						if c == '\n' {
							self.line += 1;
						}
						self.advance();
					}
					if !closed {
						return Err(TokenError::new(opening_line, TokenErrorKind::UnterminatedBlockComment).into());
					}
				}
				_ => return Ok(()),
			}
		}
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	fn identifier_or_keyword(&mut self) -> Token<'a> {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let lexeme = &self.source[self.start..self.cursor];
		Token::new(TokenKind::keyword_or_identifier(lexeme), lexeme, self.line)
	}

	fn integer_constant(&mut self) -> Token<'a> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}
		Token::new(TokenKind::IntegerConstant, &self.source[self.start..self.cursor], self.line)
	}

	/// Scan a string constant. The lexeme keeps both quote characters so code
	/// generation can strip them; a newline before the closing quote is an
	/// error distinct from running out of input.
	fn string_constant(&mut self) -> Result<Token<'a>, TokenizerError> {
		self.advance(); // the opening "
		loop {
			match self.peek() {
				Some('"') => break,
				Some('\n') => return Err(TokenError::new(self.line, TokenErrorKind::NewLineInString).into()),
				Some(_) => {
					self.advance();
				}
				None => return Err(TokenError::new(self.line, TokenErrorKind::UnterminatedString).into()),
			}
		}
		self.advance(); // the closing "
		Ok(Token::new(TokenKind::StringConstant, &self.source[self.start..self.cursor], self.line))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Tokenize the whole input, asserting on overall success
	fn scan(input: &str, ok: bool) {
		let mut tokenizer = Tokenizer::new(input);
		loop {
			match tokenizer.next_token() {
				Ok(token) if token.kind == TokenKind::Eof => {
					assert!(ok, "expected failure for {input:?}");
					return;
				}
				Ok(_) => {}
				Err(_) => {
					assert!(!ok, "expected success for {input:?}");
					return;
				}
			}
		}
	}

	fn kinds(input: &str) -> Vec<(TokenKind, String)> {
		let mut tokenizer = Tokenizer::new(input);
		let mut out = Vec::new();
		loop {
			let token = tokenizer.next_token().unwrap();
			if token.kind == TokenKind::Eof {
				return out;
			}
			out.push((token.kind, token.lexeme.to_string()));
		}
	}

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("(){}[]", true);
		scan(" ( ) ", true);
		scan("@", false);
		scan("#", false);
		scan("class Foo {}", true);
		scan("12345", true);
		scan(r#""hello""#, true);
		scan("// comment only", true);
		scan("/* unterminated ", false);
	}

	#[test]
	fn scan_keywords_and_identifiers() {
		assert_eq!(kinds("class let letter"), vec![
			(TokenKind::Keyword, "class".to_string()),
			(TokenKind::Keyword, "let".to_string()),
			(TokenKind::Identifier, "letter".to_string()),
		]);
		assert_eq!(kinds("_x x1 while9")[0].0, TokenKind::Identifier);
		assert_eq!(kinds("while9"), vec![(TokenKind::Identifier, "while9".to_string())]);
	}

	#[test]
	fn scan_integer_constants() {
		assert_eq!(kinds("0 42 32767"), vec![
			(TokenKind::IntegerConstant, "0".to_string()),
			(TokenKind::IntegerConstant, "42".to_string()),
			(TokenKind::IntegerConstant, "32767".to_string()),
		]);
		// an identifier may not start with a digit, so `9x` is two tokens
		assert_eq!(kinds("9x").len(), 2);
	}

	#[test]
	fn scan_string_constants() {
		// the lexeme keeps its quotes for downstream stripping
		assert_eq!(kinds(r#""hi there""#), vec![(TokenKind::StringConstant, "\"hi there\"".to_string())]);
		scan(r#""unterminated"#, false);
		scan("\"no\nnewlines\"", false);
	}

	#[test]
	fn scan_symbols() {
		let all = "()[]{},;=.+-*/&|~<>";
		let tokens = kinds(all);
		assert_eq!(tokens.len(), all.len());
		assert!(tokens.iter().all(|(kind, _)| *kind == TokenKind::Symbol));
	}

	#[test]
	fn scan_comments() {
		assert_eq!(kinds("// line comment\nfoo").len(), 1);
		assert_eq!(kinds("/* block */ foo /* another */").len(), 1);
		assert_eq!(kinds("/* multi\nline\ncomment */ foo").len(), 1);
		scan("/* unterminated\nover lines", false);
	}

	#[test]
	fn line_numbers_count_comment_newlines() {
		let mut tokenizer = Tokenizer::new("/* one\ntwo\n*/ // three\nfoo");
		let token = tokenizer.next_token().unwrap();
		assert_eq!(token.lexeme, "foo");
		assert_eq!(token.line, 4);
	}

	#[test]
	fn peek_caches_one_token() {
		let mut tokenizer = Tokenizer::new("class Foo");
		let peeked = tokenizer.peek_token().unwrap();
		let consumed = tokenizer.next_token().unwrap();
		assert_eq!(peeked, consumed);
		assert_eq!(tokenizer.next_token().unwrap().lexeme, "Foo");
	}

	#[test]
	fn tokenizing_twice_is_identical() {
		let source = "class Foo { field int x; method int get() { return x; } }";
		let first: Vec<_> = kinds(source);
		let second: Vec<_> = kinds(source);
		assert_eq!(first, second);
	}

	#[test]
	fn unterminated_block_comment_reports_opening_line() {
		let mut tokenizer = Tokenizer::new("\n\n/* never closed\n\n");
		let error = tokenizer.next_token().unwrap_err();
		assert!(error.to_string().contains("(LINE 3)"), "{error}");
	}
}
