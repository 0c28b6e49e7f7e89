//! The single-pass engine.
//!
//! One recursive descent drives everything: each grammar production is one
//! method that consumes tokens, checks the semantic rules that apply at that
//! point, mutates the scope stack, and appends instructions. No syntax tree
//! is ever built; the tree exists only as the call stack of these methods,
//! which is what makes this a single-pass compiler.
//!
//! Statement grammar:
//!
//! ``` BNF
//! program        → class? EOF ;
//! class          → "class" IDENTIFIER "{" member* "}" ;
//! member         → ("static" | "field") type varName ("," varName)* ";"
//!                | ("constructor" | "function" | "method") ("void" | type)
//!                  IDENTIFIER "(" parameters ")" body ;
//! body           → "{" statement* "}" ;
//! statement      → varDecl | letStmt | ifStmt | whileStmt | doStmt | returnStmt ;
//! ```
//!
//! The expression grammar lives in the sibling module.

mod expression;

use log::warn;

use crate::{
	emitter::{Emitter, Instruction, LabelAllocator, Segment},
	error::{
		parser::{ParseError, ParseErrorKind, ParserError},
		CompileError,
	},
	resolver::{PendingReference, Resolver},
	symbols::{types_compatible, ScopeStack, Symbol, SymbolKind, SymbolPayload},
	tokenizer::{Token, TokenKind, Tokenizer},
};

/// Compiles one source file against the shared state of a compilation run.
pub struct Parser<'s, 'c> {
	tokenizer: Tokenizer<'s>,
	/// Display name of the file, recorded into deferred references
	file:      &'c str,
	scopes:    &'c mut ScopeStack,
	resolver:  &'c mut Resolver,
	labels:    &'c mut LabelAllocator,
	emitter:   Emitter,

	/// Name of the class this file defines
	class_name:      String,
	/// Declared return type of the subroutine currently being compiled
	return_type:     String,
	/// Kind of the subroutine currently being compiled
	subroutine_kind: SymbolKind,
	/// Whether every path through the statements so far has returned
	returns:         bool,
	/// Slots of `push constant <nFields>` emitted for constructors, patched
	/// once the whole class body is parsed and the field count is final
	alloc_slots:     Vec<usize>,
}

impl<'s, 'c> Parser<'s, 'c> {
	pub fn new(
		file: &'c str,
		source: &'s str,
		scopes: &'c mut ScopeStack,
		resolver: &'c mut Resolver,
		labels: &'c mut LabelAllocator,
	) -> Self {
		Self {
			tokenizer: Tokenizer::new(source),
			file,
			scopes,
			resolver,
			labels,
			emitter: Emitter::default(),
			class_name: String::new(),
			return_type: "void".to_string(),
			subroutine_kind: SymbolKind::Function,
			returns: false,
			alloc_slots: Vec::new(),
		}
	}

	/// Compile the whole file: zero or one class followed by end of input.
	pub fn compile(mut self) -> Result<Vec<Instruction>, CompileError> {
		if self.tokenizer.peek_token()?.kind != TokenKind::Eof {
			self.class_definition()?;
			self.resolver.resolve_for_class(&self.class_name, self.scopes)?;
		}
		let token = self.tokenizer.next_token()?;
		if token.kind != TokenKind::Eof {
			return Err(self.expected("the EOF token", &token).into());
		}
		Ok(self.emitter.finish())
	}

	fn class_definition(&mut self) -> Result<(), ParserError> {
		self.consume_keyword("class")?;
		let name = self.consume_identifier()?;
		if !self.scopes.push_class_scope(name.lexeme) {
			return Err(ParseError::new(
				name.line,
				name.lexeme,
				ParseErrorKind::DuplicateClass(name.lexeme.to_string()),
			)
			.into());
		}
		self.class_name = name.lexeme.to_string();
		self.consume_symbol("{")?;
		loop {
			let next = self.tokenizer.peek_token()?;
			match next.lexeme {
				"static" | "field" => self.class_variable_definition()?,
				"constructor" | "function" | "method" => self.subroutine_definition()?,
				_ => break,
			}
		}
		self.consume_symbol("}")?;
		// Constructors allocate one word per field; the count is only final
		// now that the whole class body has been seen.
		let fields = self.scopes.field_count(&self.class_name);
		for slot in std::mem::take(&mut self.alloc_slots) {
			self.emitter.patch(slot, Instruction::Push(Segment::Constant, fields));
		}
		Ok(())
	}

	fn class_variable_definition(&mut self) -> Result<(), ParserError> {
		let keyword = self.tokenizer.next_token()?;
		let kind = if keyword.lexeme == "static" { SymbolKind::Static } else { SymbolKind::Field };
		let r#type = self.declared_type()?;
		self.variable_list(kind, &r#type)
	}

	/// `<Identifier> (, <Identifier>)* ;` declaring symbols of one kind.
	fn variable_list(&mut self, kind: SymbolKind, r#type: &str) -> Result<(), ParserError> {
		loop {
			let name = self.consume_identifier()?;
			if self.scopes.exists_in_current_scope(name.lexeme, kind) {
				return Err(ParseError::new(
					name.line,
					name.lexeme,
					ParseErrorKind::Redeclaration(name.lexeme.to_string()),
				)
				.into());
			}
			self.scopes.add_data_symbol(name.lexeme, kind, r#type);
			let token = self.tokenizer.next_token()?;
			match token.lexeme {
				"," => continue,
				";" => return Ok(()),
				_ => return Err(self.expected("the SYMBOL ',' or the SYMBOL ';'", &token)),
			}
		}
	}

	fn subroutine_definition(&mut self) -> Result<(), ParserError> {
		let keyword = self.tokenizer.next_token()?;
		let kind = match keyword.lexeme {
			"constructor" => SymbolKind::Constructor,
			"function" => SymbolKind::Function,
			_ => SymbolKind::Method,
		};
		let return_type = if self.peek_is("void")? {
			self.tokenizer.next_token()?.lexeme.to_string()
		} else {
			self.declared_type()?
		};
		let name = self.consume_identifier()?;
		if self.scopes.exists_in_current_scope(name.lexeme, kind) {
			return Err(ParseError::new(
				name.line,
				name.lexeme,
				ParseErrorKind::Redeclaration(name.lexeme.to_string()),
			)
			.into());
		}

		self.consume_symbol("(")?;
		let parameters = self.parameter_list()?;
		self.consume_symbol(")")?;

		// The callable goes into the class scope before its body is parsed,
		// so the body may call it recursively.
		let parameter_types = parameters.iter().map(|(r#type, ..)| r#type.clone()).collect();
		self.scopes.add_callable_symbol(name.lexeme, kind, &return_type, parameter_types);

		self.scopes.push_subroutine_scope();
		if kind == SymbolKind::Method {
			// the hidden receiver occupies argument 0
			self.scopes.add_data_symbol("this", SymbolKind::Argument, &self.class_name);
		}
		for (r#type, parameter, line) in parameters {
			if self.scopes.exists_in_current_scope(&parameter, SymbolKind::Argument) {
				return Err(ParseError::new(
					line,
					parameter.clone(),
					ParseErrorKind::Redeclaration(parameter),
				)
				.into());
			}
			self.scopes.add_data_symbol(&parameter, SymbolKind::Argument, &r#type);
		}

		// The local count is only known once the body has been parsed.
		let qualified = format!("{}.{}", self.class_name, name.lexeme);
		let function_slot = self.emitter.emit_placeholder(Instruction::Function(qualified.clone(), 0));
		match kind {
			SymbolKind::Constructor => {
				let slot = self.emitter.emit_placeholder(Instruction::Push(Segment::Constant, 0));
				self.alloc_slots.push(slot);
				self.emitter.emit(Instruction::Call("Memory.alloc".to_string(), 1));
				self.emitter.emit(Instruction::Pop(Segment::Pointer, 0));
			}
			SymbolKind::Method => {
				self.emitter.emit(Instruction::Push(Segment::Argument, 0));
				self.emitter.emit(Instruction::Pop(Segment::Pointer, 0));
			}
			_ => {}
		}

		self.return_type = return_type;
		self.subroutine_kind = kind;
		self.returns = false;
		self.body()?;
		if !self.returns {
			return Err(ParseError::new(name.line, name.lexeme, ParseErrorKind::MissingReturn).into());
		}
		self.emitter.patch(function_slot, Instruction::Function(qualified, self.scopes.local_count()));
		self.scopes.pop_subroutine_scope();
		Ok(())
	}

	/// `(<type> <Identifier> (, <type> <Identifier>)*)?` collected without
	/// declaring yet; the caller owns the order of scope mutations.
	fn parameter_list(&mut self) -> Result<Vec<(String, String, usize)>, ParserError> {
		let mut parameters = Vec::new();
		if self.peek_is(")")? {
			return Ok(parameters);
		}
		loop {
			let r#type = self.declared_type()?;
			let name = self.consume_identifier()?;
			parameters.push((r#type, name.lexeme.to_string(), name.line));
			if !self.peek_is(",")? {
				return Ok(parameters);
			}
			self.tokenizer.next_token()?;
		}
	}

	/// A primitive type name or a class name; unseen class names become
	/// forward references.
	fn declared_type(&mut self) -> Result<String, ParserError> {
		let token = self.tokenizer.next_token()?;
		let primitive = matches!(token.lexeme, "int" | "char" | "boolean");
		if !primitive && token.kind != TokenKind::Identifier {
			return Err(self.expected(
				"the KEYWORD 'int', the KEYWORD 'char', the KEYWORD 'boolean' or an IDENTIFIER",
				&token,
			));
		}
		if token.kind == TokenKind::Identifier {
			self.register_class_reference(&token);
		}
		Ok(token.lexeme.to_string())
	}

	fn body(&mut self) -> Result<(), ParserError> {
		self.consume_symbol("{")?;
		let mut warned_unreachable = false;
		loop {
			let next = self.tokenizer.peek_token()?;
			if !matches!(next.lexeme, "var" | "let" | "if" | "while" | "do" | "return") {
				break;
			}
			if self.returns && !warned_unreachable {
				warn!("(LINE {}) Unreachable code: every path has already returned", next.line);
				warned_unreachable = true;
			}
			self.statement()?;
		}
		self.consume_symbol("}")?;
		Ok(())
	}

	fn statement(&mut self) -> Result<(), ParserError> {
		let token = self.tokenizer.next_token()?;
		match token.lexeme {
			"var" => self.variable_declaration(),
			"let" => self.let_statement(),
			"if" => self.if_statement(),
			"while" => self.while_statement(),
			"do" => self.do_statement(),
			"return" => self.return_statement(&token),
			_ => Err(self.expected(
				"the KEYWORD 'var', the KEYWORD 'let', the KEYWORD 'if', the KEYWORD 'while', the KEYWORD 'do' or the KEYWORD 'return'",
				&token,
			)),
		}
	}

	fn variable_declaration(&mut self) -> Result<(), ParserError> {
		let r#type = self.declared_type()?;
		self.variable_list(SymbolKind::Var, &r#type)
	}

	fn let_statement(&mut self) -> Result<(), ParserError> {
		let name = self.consume_identifier()?;
		let Some(symbol) = self.scopes.lookup_data(name.lexeme).cloned() else {
			return Err(ParseError::new(
				name.line,
				name.lexeme,
				ParseErrorKind::UnknownIdentifier(name.lexeme.to_string()),
			)
			.into());
		};
		let next = self.tokenizer.next_token()?;
		match next.lexeme {
			"[" => {
				// address = base + index, parked in the `that` pointer before
				// the right-hand side is evaluated
				self.push_data_symbol(&symbol, name.line, true);
				let index_type = self.expression()?;
				self.check_array_index(&index_type, &name)?;
				self.consume_symbol("]")?;
				self.emitter.emit(Instruction::Add);
				self.emitter.emit(Instruction::Pop(Segment::Pointer, 1));
				self.consume_symbol("=")?;
				self.expression()?;
				self.consume_symbol(";")?;
				self.emitter.emit(Instruction::Pop(Segment::That, 0));
			}
			"=" => {
				let value_type = self.expression()?;
				if !types_compatible(&symbol.r#type, &value_type) {
					return Err(ParseError::new(name.line, name.lexeme, ParseErrorKind::TypeMismatch {
						expected: symbol.r#type.clone(),
						found:    value_type,
					})
					.into());
				}
				self.consume_symbol(";")?;
				self.mark_initialised(name.lexeme);
				self.pop_data_symbol(&symbol);
			}
			_ => return Err(self.expected("the SYMBOL '[' or the SYMBOL '='", &next)),
		}
		Ok(())
	}

	fn if_statement(&mut self) -> Result<(), ParserError> {
		let number = self.labels.allocate();
		self.consume_symbol("(")?;
		self.emitter.emit(Instruction::Label(format!("IF{number}")));
		self.expression()?;
		self.consume_symbol(")")?;
		self.emitter.emit(Instruction::Not);
		self.emitter.emit(Instruction::IfGoto(format!("ELSE{number}")));

		let outer_returns = self.returns;
		self.returns = false;
		self.body()?;
		let then_returns = self.returns;

		self.emitter.emit(Instruction::Goto(format!("END{number}")));
		self.emitter.emit(Instruction::Label(format!("ELSE{number}")));
		let mut else_returns = false;
		if self.peek_is("else")? {
			self.tokenizer.next_token()?;
			self.returns = false;
			self.body()?;
			else_returns = self.returns;
		}
		self.emitter.emit(Instruction::Label(format!("END{number}")));

		// an if only guarantees a return when both branches do
		self.returns = outer_returns || (then_returns && else_returns);
		Ok(())
	}

	fn while_statement(&mut self) -> Result<(), ParserError> {
		let number = self.labels.allocate();
		self.consume_symbol("(")?;
		self.emitter.emit(Instruction::Label(format!("LOOP{number}")));
		self.expression()?;
		self.consume_symbol(")")?;
		self.emitter.emit(Instruction::Not);
		self.emitter.emit(Instruction::IfGoto(format!("END{number}")));

		// the loop body may never run, so it guarantees nothing
		let outer_returns = self.returns;
		self.returns = false;
		self.body()?;
		self.returns = outer_returns;

		self.emitter.emit(Instruction::Goto(format!("LOOP{number}")));
		self.emitter.emit(Instruction::Label(format!("END{number}")));
		Ok(())
	}

	fn do_statement(&mut self) -> Result<(), ParserError> {
		let name = self.consume_identifier()?;
		self.subroutine_call(&name)?;
		self.consume_symbol(";")?;
		// a do statement discards the call's return value
		self.emitter.emit(Instruction::Pop(Segment::Temp, 0));
		Ok(())
	}

	fn return_statement(&mut self, keyword: &Token) -> Result<(), ParserError> {
		if self.peek_is(";")? {
			self.tokenizer.next_token()?;
			if self.return_type != "void" {
				return Err(ParseError::new(keyword.line, keyword.lexeme, ParseErrorKind::TypeMismatch {
					expected: self.return_type.clone(),
					found:    "void".to_string(),
				})
				.into());
			}
			// void subroutines still leave a word for the caller to discard
			self.emitter.emit(Instruction::Push(Segment::Constant, 0));
		} else {
			let value_type = self.expression()?;
			if !types_compatible(&self.return_type, &value_type) {
				return Err(ParseError::new(keyword.line, keyword.lexeme, ParseErrorKind::TypeMismatch {
					expected: self.return_type.clone(),
					found:    value_type,
				})
				.into());
			}
			self.consume_symbol(";")?;
		}
		self.emitter.emit(Instruction::Return);
		self.returns = true;
		Ok(())
	}

	// ---- shared helpers ----

	fn expected(&self, what: &str, token: &Token) -> ParserError {
		let lexeme = if token.kind == TokenKind::Eof { "EOF" } else { token.lexeme };
		ParseError::new(token.line, lexeme, ParseErrorKind::Expected(what.to_string())).into()
	}

	fn consume_symbol(&mut self, symbol: &str) -> Result<(), ParserError> {
		let token = self.tokenizer.next_token()?;
		if token.kind == TokenKind::Symbol && token.lexeme == symbol {
			Ok(())
		} else {
			Err(self.expected(&format!("the SYMBOL '{symbol}'"), &token))
		}
	}

	fn consume_keyword(&mut self, keyword: &str) -> Result<(), ParserError> {
		let token = self.tokenizer.next_token()?;
		if token.kind == TokenKind::Keyword && token.lexeme == keyword {
			Ok(())
		} else {
			Err(self.expected(&format!("the KEYWORD '{keyword}'"), &token))
		}
	}

	fn consume_identifier(&mut self) -> Result<Token<'s>, ParserError> {
		let token = self.tokenizer.next_token()?;
		if token.kind == TokenKind::Identifier {
			Ok(token)
		} else {
			Err(self.expected("an IDENTIFIER", &token))
		}
	}

	fn peek_is(&mut self, lexeme: &str) -> Result<bool, ParserError> {
		Ok(self.tokenizer.peek_token()?.lexeme == lexeme)
	}

	fn check_array_index(&self, index_type: &str, name: &Token) -> Result<(), ParserError> {
		if matches!(index_type, "int" | "char" | "any") {
			Ok(())
		} else {
			Err(
				ParseError::new(name.line, name.lexeme, ParseErrorKind::InvalidArrayIndex(index_type.to_string()))
					.into(),
			)
		}
	}

	/// Push a data symbol's value, warning on reads that may precede any
	/// assignment. Receiver-only uses pass `warn_uninitialised: false`.
	fn push_data_symbol(&mut self, symbol: &Symbol, line: usize, warn_uninitialised: bool) {
		let SymbolPayload::Data { offset, initialised } = symbol.payload else { return };
		if warn_uninitialised && !initialised {
			warn!("(LINE {line}) The variable '{}' may be read before it is initialised", symbol.name);
		}
		self.emitter.emit(Instruction::Push(segment_for(symbol.kind), offset));
	}

	fn pop_data_symbol(&mut self, symbol: &Symbol) {
		let SymbolPayload::Data { offset, .. } = symbol.payload else { return };
		self.emitter.emit(Instruction::Pop(segment_for(symbol.kind), offset));
	}

	fn mark_initialised(&mut self, name: &str) {
		if !self.scopes.mark_initialised(name) {
			let qualified = format!("{}.{name}", self.class_name);
			self.scopes.mark_initialised(&qualified);
		}
	}

	fn register_class_reference(&mut self, token: &Token) {
		self.resolver.register(
			PendingReference {
				name:       token.lexeme.to_string(),
				file:       self.file.to_string(),
				line:       token.line,
				kind:       SymbolKind::Class,
				parameters: None,
			},
			self.scopes,
		);
	}

	fn register_call_reference(&mut self, name: &str, line: usize, arguments: Vec<String>) {
		self.resolver.register(
			PendingReference {
				name: name.to_string(),
				file: self.file.to_string(),
				line,
				kind: SymbolKind::Function,
				parameters: Some(arguments),
			},
			self.scopes,
		);
	}
}

/// The memory segment a data symbol's kind maps onto.
fn segment_for(kind: SymbolKind) -> Segment {
	match kind {
		SymbolKind::Static => Segment::Static,
		SymbolKind::Field => Segment::This,
		SymbolKind::Argument => Segment::Argument,
		_ => Segment::Local,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	pub(super) fn compile(source: &str) -> Result<Vec<String>, CompileError> {
		let mut compiler = crate::Compiler::new();
		let instructions = compiler.compile_source("Test.jack", source)?;
		compiler.assert_all_resolved()?;
		Ok(instructions.iter().map(ToString::to_string).collect())
	}

	fn assert_fails(source: &str, message_fragment: &str) {
		let error = compile(source).unwrap_err();
		assert!(error.to_string().contains(message_fragment), "{error}");
	}

	#[test]
	fn empty_input_compiles_to_nothing() {
		assert!(compile("").unwrap().is_empty());
	}

	#[test]
	fn method_reading_a_field_round_trips() {
		let instructions = compile("class Foo { field int x; method int get() { return x; } }").unwrap();
		assert_eq!(instructions, vec![
			"function Foo.get 0",
			"push argument 0",
			"pop pointer 0",
			"push this 0",
			"return",
		]);
	}

	#[test]
	fn constructor_allocation_is_patched_with_the_field_count() {
		let instructions = compile(
			"class Point {
				field int x;
				constructor Point new() { return this; }
				field int y, z;
			}",
		)
		.unwrap();
		assert_eq!(instructions, vec![
			"function Point.new 0",
			"push constant 3",
			"call Memory.alloc 1",
			"pop pointer 0",
			"push pointer 0",
			"return",
		]);
	}

	#[test]
	fn let_statement_assigns_locals() {
		let instructions =
			compile("class Foo { function int half() { var int a; let a = 4; return a; } }").unwrap();
		assert_eq!(instructions, vec![
			"function Foo.half 1",
			"push constant 4",
			"pop local 0",
			"push local 0",
			"return",
		]);
	}

	#[test]
	fn do_statement_discards_the_return_value() {
		let instructions =
			compile("class Foo { function void stop() { return; } function void go() { do stop(); return; } }")
				.unwrap();
		assert!(instructions.contains(&"call Foo.stop 0".to_string()));
		let position = instructions.iter().position(|i| i == "call Foo.stop 0").unwrap();
		assert_eq!(instructions[position + 1], "pop temp 0");
	}

	#[test]
	fn while_loops_use_negated_conditions() {
		let instructions = compile("class Foo { function void spin() { while (true) { } return; } }").unwrap();
		assert_eq!(instructions, vec![
			"function Foo.spin 0",
			"label LOOP0",
			"push constant 1",
			"neg",
			"not",
			"if-goto END0",
			"goto LOOP0",
			"label END0",
			"push constant 0",
			"return",
		]);
	}

	#[test]
	fn if_else_allocates_one_label_triple() {
		let instructions =
			compile("class Foo { function int pick(boolean b) { if (b) { return 1; } else { return 2; } } }")
				.unwrap();
		assert!(instructions.contains(&"label IF0".to_string()));
		assert!(instructions.contains(&"if-goto ELSE0".to_string()));
		assert!(instructions.contains(&"label END0".to_string()));
	}

	#[test]
	fn missing_return_path_is_fatal() {
		assert_fails(
			"class Foo { function int pick(boolean b) { if (b) { return 1; } } }",
			"Not all code paths",
		);
		assert_fails("class Foo { function void nop() { } }", "Not all code paths");
	}

	#[test]
	fn both_branches_returning_satisfies_the_checker() {
		assert!(
			compile("class Foo { function int pick(boolean b) { if (b) { return 1; } else { return 2; } } }")
				.is_ok()
		);
	}

	#[test]
	fn return_type_checking() {
		assert_fails("class Foo { function int get() { return; } }", "Expected a value of type 'int'");
		assert_fails("class Foo { function void go() { return 1; } }", "Expected a value of type 'void'");
		// int and char are mutually compatible
		assert!(compile("class Foo { function char low(int x) { return x; } }").is_ok());
	}

	#[test]
	fn redeclarations_are_fatal_per_bucket() {
		assert_fails("class Foo { field int x; static int x; }", "already been declared");
		assert_fails(
			"class Foo { function void go(int a) { var boolean a; return; } }",
			"already been declared",
		);
		assert_fails(
			"class Foo { function void go() { return; } method int go() { return 1; } }",
			"already been declared",
		);
		// a field and a method may share a name
		assert!(compile("class Foo { field int x; method int x() { return 1; } }").is_ok());
	}

	#[test]
	fn duplicate_class_definition_is_fatal() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		let mut labels = LabelAllocator::default();
		let source = "class Foo { }";
		Parser::new("A.jack", source, &mut scopes, &mut resolver, &mut labels).compile().unwrap();
		let error = Parser::new("B.jack", source, &mut scopes, &mut resolver, &mut labels).compile().unwrap_err();
		assert!(error.to_string().contains("already been defined"), "{error}");
	}

	#[test]
	fn assignment_type_mismatch_is_fatal() {
		assert_fails(
			"class Foo { function void go() { var boolean b; let b = 3; return; } }",
			"Expected a value of type 'boolean'",
		);
	}

	#[test]
	fn let_to_an_undeclared_name_is_fatal() {
		assert_fails("class Foo { function void go() { let x = 1; return; } }", "has not been declared");
	}

	#[test]
	fn statics_allocate_run_wide_offsets() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		let mut labels = LabelAllocator::default();
		let first = "class A { static int a; function int get() { return a; } }";
		let second = "class B { static int b; function int get() { return b; } }";
		Parser::new("A.jack", first, &mut scopes, &mut resolver, &mut labels).compile().unwrap();
		let instructions =
			Parser::new("B.jack", second, &mut scopes, &mut resolver, &mut labels).compile().unwrap();
		assert!(instructions.contains(&Instruction::Push(Segment::Static, 1)));
	}

	#[test]
	fn label_numbers_continue_across_files() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		let mut labels = LabelAllocator::default();
		let first = "class A { function void go() { while (true) { } return; } }";
		let second = "class B { function void go() { while (true) { } return; } }";
		Parser::new("A.jack", first, &mut scopes, &mut resolver, &mut labels).compile().unwrap();
		let instructions =
			Parser::new("B.jack", second, &mut scopes, &mut resolver, &mut labels).compile().unwrap();
		assert!(instructions.contains(&Instruction::Label("LOOP1".to_string())));
	}
}
