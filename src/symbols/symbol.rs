/// Role of a declared name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
	Static,
	Field,
	Var,
	Argument,
	Function,
	Method,
	Constructor,
	Class,
}

impl SymbolKind {
	/// Two kinds share a visibility bucket when declaring both under one name
	/// in the same scope would be a redeclaration.
	pub fn same_bucket(self, other: SymbolKind) -> bool {
		use SymbolKind::*;
		matches!(
			(self, other),
			(Argument | Var, Argument | Var)
				| (Field | Static, Field | Static)
				| (Function | Method | Constructor, Function | Method | Constructor)
				| (Class, Class)
		)
	}

}

/// What a symbol carries besides its name, kind and type: data symbols hold a
/// segment offset and an initialisation flag, callable symbols an ordered
/// parameter type list. Use sites pattern-match on the variant they expect.
#[derive(Debug, Clone)]
pub enum SymbolPayload {
	Data { offset: u16, initialised: bool },
	Callable { parameters: Vec<String> },
}

/// One declared name
#[derive(Debug, Clone)]
pub struct Symbol {
	pub name:    String,
	pub kind:    SymbolKind,
	/// A primitive type name, a class name, `void`, or `any` for types that
	/// could not be narrowed statically
	pub r#type:  String,
	pub payload: SymbolPayload,
}

/// The type names that never name a user class.
pub fn is_builtin_type(name: &str) -> bool { matches!(name, "int" | "char" | "boolean" | "void" | "any") }

/// Assignment/argument/return compatibility: `int` and `char` are mutually
/// compatible, `any` is compatible with everything.
pub fn types_compatible(expected: &str, found: &str) -> bool {
	expected == found
		|| expected == "any"
		|| found == "any"
		|| (matches!(expected, "int" | "char") && matches!(found, "int" | "char"))
}
