//! Expression productions.
//!
//! Precedence, loosest first:
//!
//! ``` BNF
//! expression     → relational ( ( "&" | "|" ) relational )* ;
//! relational     → arithmetic ( ( "=" | ">" | "<" ) arithmetic )* ;
//! arithmetic     → term ( ( "+" | "-" ) term )* ;
//! term           → factor ( ( "*" | "/" ) factor )* ;
//! factor         → ( "-" | "~" ) factor | operand ;
//! operand        → INTEGERCONSTANT | STRINGCONSTANT | "true" | "false"
//!                | "null" | "this" | "(" expression ")"
//!                | IDENTIFIER ( "[" expression "]" | "." IDENTIFIER call | call )? ;
//! call           → "(" ( expression ( "," expression )* )? ")" ;
//! ```
//!
//! Every production returns the static type of the value it left on the
//! stack. `any` stands for a type that could not be narrowed, such as `null`
//! or the result of a call whose defining class has not been compiled yet;
//! it is compatible with everything. Operators emit their single matching
//! instruction, except `*` and `/` which the machine has no instruction for
//! and which compile to the two-argument library routines.

use crate::{
	emitter::{Instruction, Segment},
	error::parser::{ParseError, ParseErrorKind, ParserError},
	symbols::{is_builtin_type, types_compatible, SymbolKind, SymbolPayload},
	tokenizer::{Token, TokenKind},
};

use super::Parser;

impl<'s, 'c> Parser<'s, 'c> {
	pub(super) fn expression(&mut self) -> Result<String, ParserError> {
		let mut r#type = self.relational_expression()?;
		loop {
			let next = self.tokenizer.peek_token()?;
			let instruction = match next.lexeme {
				"&" => Instruction::And,
				"|" => Instruction::Or,
				_ => return Ok(r#type),
			};
			self.tokenizer.next_token()?;
			let right = self.relational_expression()?;
			self.emitter.emit(instruction);
			if r#type == "any" {
				r#type = right;
			}
		}
	}

	fn relational_expression(&mut self) -> Result<String, ParserError> {
		let mut r#type = self.arithmetic_expression()?;
		loop {
			let next = self.tokenizer.peek_token()?;
			let instruction = match next.lexeme {
				"=" => Instruction::Eq,
				">" => Instruction::Gt,
				"<" => Instruction::Lt,
				_ => return Ok(r#type),
			};
			self.tokenizer.next_token()?;
			self.arithmetic_expression()?;
			self.emitter.emit(instruction);
			r#type = "boolean".to_string();
		}
	}

	fn arithmetic_expression(&mut self) -> Result<String, ParserError> {
		let mut r#type = self.term()?;
		loop {
			let next = self.tokenizer.peek_token()?;
			let instruction = match next.lexeme {
				"+" => Instruction::Add,
				"-" => Instruction::Sub,
				_ => return Ok(r#type),
			};
			self.tokenizer.next_token()?;
			self.term()?;
			self.emitter.emit(instruction);
			r#type = "int".to_string();
		}
	}

	fn term(&mut self) -> Result<String, ParserError> {
		let mut r#type = self.factor()?;
		loop {
			let next = self.tokenizer.peek_token()?;
			let routine = match next.lexeme {
				"*" => "Math.multiply",
				"/" => "Math.divide",
				_ => return Ok(r#type),
			};
			self.tokenizer.next_token()?;
			self.factor()?;
			self.emitter.emit(Instruction::Call(routine.to_string(), 2));
			r#type = "int".to_string();
		}
	}

	fn factor(&mut self) -> Result<String, ParserError> {
		let next = self.tokenizer.peek_token()?;
		match next.lexeme {
			"-" => {
				self.tokenizer.next_token()?;
				self.factor()?;
				self.emitter.emit(Instruction::Neg);
				Ok("int".to_string())
			}
			"~" => {
				self.tokenizer.next_token()?;
				let r#type = self.factor()?;
				self.emitter.emit(Instruction::Not);
				Ok(r#type)
			}
			_ => self.operand(),
		}
	}

	fn operand(&mut self) -> Result<String, ParserError> {
		let token = self.tokenizer.next_token()?;
		match token.kind {
			TokenKind::IntegerConstant => {
				let value = match token.lexeme.parse::<u16>() {
					Ok(value) if value <= 32767 => value,
					_ => {
						return Err(ParseError::new(
							token.line,
							token.lexeme,
							ParseErrorKind::IntegerOutOfRange(token.lexeme.to_string()),
						)
						.into());
					}
				};
				self.emitter.emit(Instruction::Push(Segment::Constant, value));
				Ok("int".to_string())
			}
			TokenKind::StringConstant => {
				self.string_constant(token.lexeme);
				Ok("String".to_string())
			}
			TokenKind::Keyword => match token.lexeme {
				"true" => {
					self.emitter.emit(Instruction::Push(Segment::Constant, 1));
					self.emitter.emit(Instruction::Neg);
					Ok("boolean".to_string())
				}
				"false" => {
					self.emitter.emit(Instruction::Push(Segment::Constant, 0));
					Ok("boolean".to_string())
				}
				"null" => {
					self.emitter.emit(Instruction::Push(Segment::Constant, 0));
					Ok("any".to_string())
				}
				"this" => {
					self.emitter.emit(Instruction::Push(Segment::Pointer, 0));
					Ok(self.class_name.clone())
				}
				_ => Err(self.expected("an expression", &token)),
			},
			TokenKind::Identifier => self.identifier_operand(&token),
			TokenKind::Symbol if token.lexeme == "(" => {
				let r#type = self.expression()?;
				self.consume_symbol(")")?;
				Ok(r#type)
			}
			_ => Err(self.expected("an expression", &token)),
		}
	}

	/// A string constant builds a fresh string object and appends each of its
	/// characters. The lexeme still carries its surrounding quotes.
	fn string_constant(&mut self, lexeme: &str) {
		let text = &lexeme[1..lexeme.len() - 1];
		self.emitter.emit(Instruction::Push(Segment::Constant, text.chars().count() as u16));
		self.emitter.emit(Instruction::Call("String.new".to_string(), 1));
		for c in text.chars() {
			self.emitter.emit(Instruction::Push(Segment::Constant, c as u16));
			self.emitter.emit(Instruction::Call("String.appendChar".to_string(), 2));
		}
	}

	/// A bare variable read, an array access, or one of the call forms.
	fn identifier_operand(&mut self, name: &Token<'s>) -> Result<String, ParserError> {
		let next = self.tokenizer.peek_token()?;
		match next.lexeme {
			"(" | "." => self.subroutine_call(name),
			"[" => {
				self.tokenizer.next_token()?;
				let Some(symbol) = self.scopes.lookup_data(name.lexeme).cloned() else {
					return Err(ParseError::new(
						name.line,
						name.lexeme,
						ParseErrorKind::UnknownIdentifier(name.lexeme.to_string()),
					)
					.into());
				};
				self.push_data_symbol(&symbol, name.line, true);
				let index_type = self.expression()?;
				self.check_array_index(&index_type, name)?;
				self.consume_symbol("]")?;
				self.emitter.emit(Instruction::Add);
				self.emitter.emit(Instruction::Pop(Segment::Pointer, 1));
				self.emitter.emit(Instruction::Push(Segment::That, 0));
				// array elements are untyped words
				Ok("any".to_string())
			}
			_ => {
				let Some(symbol) = self.scopes.lookup_data(name.lexeme).cloned() else {
					return Err(ParseError::new(
						name.line,
						name.lexeme,
						ParseErrorKind::UnknownIdentifier(name.lexeme.to_string()),
					)
					.into());
				};
				self.push_data_symbol(&symbol, name.line, true);
				Ok(symbol.r#type)
			}
		}
	}

	/// A call in any of its three shapes: `name(...)` on the current object,
	/// `variable.name(...)` on the variable's declared class, or
	/// `Class.name(...)` with no receiver.
	pub(super) fn subroutine_call(&mut self, first: &Token<'s>) -> Result<String, ParserError> {
		let next = self.tokenizer.next_token()?;
		match next.lexeme {
			"(" => self.bare_call(first),
			"." => {
				let member = self.consume_identifier()?;
				self.consume_symbol("(")?;
				match self.scopes.lookup_data(first.lexeme).cloned() {
					Some(receiver) => {
						if is_builtin_type(&receiver.r#type) {
							return Err(ParseError::new(first.line, first.lexeme, ParseErrorKind::PrimitiveReceiver {
								name:   first.lexeme.to_string(),
								r#type: receiver.r#type.clone(),
							})
							.into());
						}
						// receiver-only use never warns about initialisation
						self.push_data_symbol(&receiver, first.line, false);
						let qualified = format!("{}.{}", receiver.r#type, member.lexeme);
						let arguments = self.expression_list()?;
						self.consume_symbol(")")?;
						let arity = arguments.len() as u16 + 1;
						let return_type = self.validate_or_defer_call(&qualified, member.line, arguments)?;
						self.emitter.emit(Instruction::Call(qualified, arity));
						Ok(return_type)
					}
					None => {
						let qualified = format!("{}.{}", first.lexeme, member.lexeme);
						let arguments = self.expression_list()?;
						self.consume_symbol(")")?;
						let arity = arguments.len() as u16;
						let return_type = self.validate_or_defer_call(&qualified, member.line, arguments)?;
						self.emitter.emit(Instruction::Call(qualified, arity));
						Ok(return_type)
					}
				}
			}
			_ => Err(self.expected("the SYMBOL '(' or the SYMBOL '.'", &next)),
		}
	}

	/// An unqualified call targets the current class. Methods get the current
	/// object as argument 0; an undeclared callee follows the flavour of the
	/// enclosing subroutine and is validated by the resolver later.
	fn bare_call(&mut self, first: &Token<'s>) -> Result<String, ParserError> {
		let qualified = format!("{}.{}", self.class_name, first.lexeme);
		let with_receiver = match self.scopes.lookup_callable(&qualified).map(|symbol| symbol.kind) {
			Some(SymbolKind::Function) => false,
			Some(_) => true,
			None => matches!(self.subroutine_kind, SymbolKind::Method | SymbolKind::Constructor),
		};
		if with_receiver {
			self.emitter.emit(Instruction::Push(Segment::Pointer, 0));
		}
		let arguments = self.expression_list()?;
		self.consume_symbol(")")?;
		let arity = arguments.len() as u16 + u16::from(with_receiver);
		let return_type = self.validate_or_defer_call(&qualified, first.line, arguments)?;
		self.emitter.emit(Instruction::Call(qualified, arity));
		Ok(return_type)
	}

	/// `(<expression> (, <expression>)*)?` up to the closing parenthesis,
	/// returning the argument types in order.
	fn expression_list(&mut self) -> Result<Vec<String>, ParserError> {
		let mut types = Vec::new();
		if self.peek_is(")")? {
			return Ok(types);
		}
		loop {
			types.push(self.expression()?);
			if !self.peek_is(",")? {
				return Ok(types);
			}
			self.tokenizer.next_token()?;
		}
	}

	/// Check a call against its declaration when the callee is already known;
	/// otherwise record it for the resolver to validate when the defining
	/// class finishes. Unknown callees type as `any`.
	fn validate_or_defer_call(
		&mut self,
		qualified: &str,
		line: usize,
		arguments: Vec<String>,
	) -> Result<String, ParserError> {
		let Some(symbol) = self.scopes.lookup_callable(qualified) else {
			self.register_call_reference(qualified, line, arguments);
			return Ok("any".to_string());
		};
		let SymbolPayload::Callable { parameters } = &symbol.payload else {
			return Ok("any".to_string());
		};
		if parameters.len() != arguments.len() {
			return Err(ParseError::new(line, qualified, ParseErrorKind::ArityMismatch {
				name:     qualified.to_string(),
				expected: parameters.len(),
				found:    arguments.len(),
			})
			.into());
		}
		for (position, (expected, found)) in parameters.iter().zip(&arguments).enumerate() {
			if !types_compatible(expected, found) {
				return Err(ParseError::new(line, qualified, ParseErrorKind::ArgumentMismatch {
					name:     qualified.to_string(),
					position: position + 1,
					expected: expected.clone(),
					found:    found.clone(),
				})
				.into());
			}
		}
		Ok(symbol.r#type.clone())
	}
}
