//! Scoped symbol tables.
//!
//! One scope is pushed per class and never popped again, so every class
//! compiled earlier in the run stays visible to every later file. A nameless
//! scope is pushed for the duration of each subroutine body and popped right
//! after it, which is what resets argument and local offsets between
//! subroutines. Name lookup walks innermost-to-outermost, but a bare data
//! name stops at the owning class scope; scopes of other classes are only
//! reachable through `Class.name` qualification or as bare class names.

mod symbol;

pub use symbol::*;

/// Allocates `static` segment offsets for a whole compilation run. Statics
/// occupy one flat address space shared by every class, so the counter lives
/// here rather than in any single scope.
#[derive(Debug, Default)]
pub struct StaticAllocator {
	next: u16,
}

impl StaticAllocator {
	pub fn allocate(&mut self) -> u16 {
		let offset = self.next;
		self.next += 1;
		offset
	}
}

/// Indexes into a scope's offset counters.
const ARGUMENT: usize = 0;
const LOCAL: usize = 1;
const FIELD: usize = 2;

/// One symbol table: a class scope (named) or a subroutine scope (nameless).
#[derive(Debug)]
pub struct Scope {
	name:    Option<String>,
	symbols: Vec<Symbol>,
	offsets: [u16; 3],
}

impl Scope {
	fn named(name: &str) -> Self { Self { name: Some(name.to_string()), symbols: Vec::new(), offsets: [0; 3] } }

	fn nameless() -> Self { Self { name: None, symbols: Vec::new(), offsets: [0; 3] } }

	fn find_data(&self, name: &str) -> Option<&Symbol> {
		self.symbols.iter().find(|s| s.name == name && matches!(s.payload, SymbolPayload::Data { .. }))
	}

	fn find_callable(&self, name: &str) -> Option<&Symbol> {
		self.symbols.iter().find(|s| s.name == name && matches!(s.payload, SymbolPayload::Callable { .. }))
	}

	fn find_in_bucket(&self, name: &str, kind: SymbolKind) -> Option<&Symbol> {
		self.symbols.iter().find(|s| s.name == name && s.kind.same_bucket(kind))
	}
}

/// The ordered stack of scopes for a compilation run.
#[derive(Debug, Default)]
pub struct ScopeStack {
	scopes:  Vec<Scope>,
	statics: StaticAllocator,
}

impl ScopeStack {
	/// Push a scope for a class header. Returns false when a class of this
	/// name was already pushed earlier in the run.
	pub fn push_class_scope(&mut self, name: &str) -> bool {
		if self.class_defined(name) {
			return false;
		}
		self.scopes.push(Scope::named(name));
		true
	}

	/// Push a nameless scope for a subroutine body. Argument and local offsets
	/// start over at zero.
	pub fn push_subroutine_scope(&mut self) { self.scopes.push(Scope::nameless()); }

	/// Pop the subroutine scope pushed last. Class scopes are never popped.
	pub fn pop_subroutine_scope(&mut self) {
		if self.scopes.last().is_some_and(|scope| scope.name.is_none()) {
			self.scopes.pop();
		}
	}

	/// Declare a data symbol in the topmost scope, assigning the next offset
	/// of its kind. Arguments count as initialised from declaration.
	pub fn add_data_symbol(&mut self, name: &str, kind: SymbolKind, r#type: &str) {
		let offset = match kind {
			SymbolKind::Static => self.statics.allocate(),
			_ => {
				let Some(scope) = self.scopes.last_mut() else { return };
				let counter = match kind {
					SymbolKind::Argument => ARGUMENT,
					SymbolKind::Var => LOCAL,
					_ => FIELD,
				};
				let offset = scope.offsets[counter];
				scope.offsets[counter] += 1;
				offset
			}
		};
		let initialised = kind == SymbolKind::Argument;
		let symbol = Symbol {
			name: name.to_string(),
			kind,
			r#type: r#type.to_string(),
			payload: SymbolPayload::Data { offset, initialised },
		};
		if let Some(scope) = self.scopes.last_mut() {
			scope.symbols.push(symbol);
		}
	}

	/// Declare a callable symbol in the topmost scope. Callables hold no
	/// offset and do not advance any counter.
	pub fn add_callable_symbol(&mut self, name: &str, kind: SymbolKind, r#type: &str, parameters: Vec<String>) {
		if let Some(scope) = self.scopes.last_mut() {
			scope.symbols.push(Symbol {
				name: name.to_string(),
				kind,
				r#type: r#type.to_string(),
				payload: SymbolPayload::Callable { parameters },
			});
		}
	}

	/// Declare a callable symbol in the named class scope, creating that scope
	/// if the class has never been seen. Used to pre-register library
	/// signatures before any user file is compiled.
	pub fn add_callable_symbol_to(
		&mut self,
		class_name: &str,
		name: &str,
		kind: SymbolKind,
		r#type: &str,
		parameters: Vec<String>,
	) {
		if !self.class_defined(class_name) {
			self.scopes.push(Scope::named(class_name));
		}
		if let Some(scope) = self.scopes.iter_mut().find(|s| s.name.as_deref() == Some(class_name)) {
			scope.symbols.push(Symbol {
				name: name.to_string(),
				kind,
				r#type: r#type.to_string(),
				payload: SymbolPayload::Callable { parameters },
			});
		}
	}

	/// Same-scope redeclaration check, restricted to the kind's bucket.
	pub fn exists_in_current_scope(&self, name: &str, kind: SymbolKind) -> bool {
		self.scopes.last().is_some_and(|scope| scope.find_in_bucket(name, kind).is_some())
	}

	/// Whole-stack existence check, restricted to the kind's bucket. Accepts
	/// `Class.name` qualification; class kinds are answered from scope names.
	pub fn exists(&self, name: &str, kind: SymbolKind) -> bool {
		if kind == SymbolKind::Class {
			return self.class_defined(name);
		}
		match name.split_once('.') {
			Some((class_name, member)) => self
				.scopes
				.iter()
				.find(|s| s.name.as_deref() == Some(class_name))
				.is_some_and(|s| s.find_in_bucket(member, kind).is_some()),
			None => self.visible_scopes().any(|scope| scope.find_in_bucket(name, kind).is_some()),
		}
	}

	/// Whether a class scope of this name was ever pushed.
	pub fn class_defined(&self, name: &str) -> bool {
		self.scopes.iter().any(|scope| scope.name.as_deref() == Some(name))
	}

	/// Find a data symbol by bare or `Class.name` qualified name, skipping
	/// callables that share the name. Bare lookup runs innermost-first and
	/// stops after the owning class scope.
	pub fn lookup_data(&self, name: &str) -> Option<&Symbol> {
		match name.split_once('.') {
			Some((class_name, member)) => {
				self.scopes.iter().find(|s| s.name.as_deref() == Some(class_name))?.find_data(member)
			}
			None => self.visible_scopes().find_map(|scope| scope.find_data(name)),
		}
	}

	/// Find a callable symbol only, skipping data symbols that share the name.
	pub fn lookup_callable(&self, name: &str) -> Option<&Symbol> {
		match name.split_once('.') {
			Some((class_name, member)) => {
				self.scopes.iter().find(|s| s.name.as_deref() == Some(class_name))?.find_callable(member)
			}
			None => self.visible_scopes().find_map(|scope| scope.find_callable(name)),
		}
	}

	/// A callable's declared parameter types, or None for missing or
	/// non-callable symbols.
	pub fn parameters_of(&self, name: &str) -> Option<Vec<String>> {
		match &self.lookup_callable(name)?.payload {
			SymbolPayload::Callable { parameters } => Some(parameters.clone()),
			SymbolPayload::Data { .. } => None,
		}
	}

	/// Mark a symbol as having been assigned. Returns false when no symbol of
	/// that name is visible; callers may retry with `Class.name`.
	pub fn mark_initialised(&mut self, name: &str) -> bool {
		let symbol = match name.split_once('.') {
			Some((class_name, member)) => self
				.scopes
				.iter_mut()
				.find(|s| s.name.as_deref() == Some(class_name))
				.and_then(|s| {
					s.symbols
						.iter_mut()
						.find(|s| s.name == member && matches!(s.payload, SymbolPayload::Data { .. }))
				}),
			None => {
				let mut found = None;
				for scope in self.scopes.iter_mut().rev() {
					let named = scope.name.is_some();
					if let Some(symbol) = scope
						.symbols
						.iter_mut()
						.find(|s| s.name == name && matches!(s.payload, SymbolPayload::Data { .. }))
					{
						found = Some(symbol);
						break;
					}
					if named {
						break;
					}
				}
				found
			}
		};
		match symbol {
			Some(Symbol { payload: SymbolPayload::Data { initialised, .. }, .. }) => {
				*initialised = true;
				true
			}
			_ => false,
		}
	}

	/// The number of locals declared in the current subroutine scope.
	pub fn local_count(&self) -> u16 { self.scopes.last().map_or(0, |scope| scope.offsets[LOCAL]) }

	/// The number of fields a class declares; the size of its instances.
	pub fn field_count(&self, class_name: &str) -> u16 {
		self
			.scopes
			.iter()
			.find(|s| s.name.as_deref() == Some(class_name))
			.map_or(0, |scope| scope.offsets[FIELD])
	}

	/// Scopes a bare data name may resolve in: everything down to and
	/// including the innermost named (class) scope.
	fn visible_scopes(&self) -> impl Iterator<Item = &Scope> {
		let mut seen_class = false;
		self.scopes.iter().rev().take_while(move |scope| {
			if seen_class {
				return false;
			}
			seen_class = scope.name.is_some();
			true
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stack_with_class(name: &str) -> ScopeStack {
		let mut scopes = ScopeStack::default();
		assert!(scopes.push_class_scope(name));
		scopes
	}

	#[test]
	fn duplicate_class_scope_is_rejected() {
		let mut scopes = stack_with_class("Foo");
		assert!(!scopes.push_class_scope("Foo"));
		assert!(scopes.push_class_scope("Bar"));
	}

	#[test]
	fn field_offsets_count_from_zero_per_class() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_data_symbol("x", SymbolKind::Field, "int");
		scopes.add_data_symbol("y", SymbolKind::Field, "int");
		assert!(matches!(scopes.lookup_data("x").unwrap().payload, SymbolPayload::Data { offset: 0, .. }));
		assert!(matches!(scopes.lookup_data("y").unwrap().payload, SymbolPayload::Data { offset: 1, .. }));

		scopes.push_class_scope("Bar");
		scopes.add_data_symbol("z", SymbolKind::Field, "int");
		assert!(matches!(scopes.lookup_data("z").unwrap().payload, SymbolPayload::Data { offset: 0, .. }));
		assert_eq!(scopes.field_count("Foo"), 2);
		assert_eq!(scopes.field_count("Bar"), 1);
	}

	#[test]
	fn static_offsets_are_global_across_classes() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_data_symbol("a", SymbolKind::Static, "int");
		scopes.push_class_scope("Bar");
		scopes.add_data_symbol("b", SymbolKind::Static, "int");
		assert!(matches!(scopes.lookup_data("b").unwrap().payload, SymbolPayload::Data { offset: 1, .. }));
	}

	#[test]
	fn argument_and_local_offsets_reset_per_subroutine() {
		let mut scopes = stack_with_class("Foo");
		scopes.push_subroutine_scope();
		scopes.add_data_symbol("a", SymbolKind::Argument, "int");
		scopes.add_data_symbol("v", SymbolKind::Var, "int");
		assert_eq!(scopes.local_count(), 1);
		scopes.pop_subroutine_scope();

		scopes.push_subroutine_scope();
		scopes.add_data_symbol("w", SymbolKind::Var, "int");
		assert!(matches!(scopes.lookup_data("w").unwrap().payload, SymbolPayload::Data { offset: 0, .. }));
		scopes.pop_subroutine_scope();
	}

	#[test]
	fn arguments_start_initialised_and_vars_do_not() {
		let mut scopes = stack_with_class("Foo");
		scopes.push_subroutine_scope();
		scopes.add_data_symbol("a", SymbolKind::Argument, "int");
		scopes.add_data_symbol("v", SymbolKind::Var, "int");
		assert!(matches!(scopes.lookup_data("a").unwrap().payload, SymbolPayload::Data { initialised: true, .. }));
		assert!(matches!(scopes.lookup_data("v").unwrap().payload, SymbolPayload::Data { initialised: false, .. }));
		assert!(scopes.mark_initialised("v"));
		assert!(matches!(scopes.lookup_data("v").unwrap().payload, SymbolPayload::Data { initialised: true, .. }));
	}

	#[test]
	fn bucket_checks_allow_same_name_across_buckets() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_data_symbol("x", SymbolKind::Field, "int");
		scopes.add_callable_symbol("x", SymbolKind::Method, "int", Vec::new());
		assert!(scopes.exists_in_current_scope("x", SymbolKind::Static));
		assert!(scopes.exists_in_current_scope("x", SymbolKind::Function));
		assert!(!scopes.exists_in_current_scope("x", SymbolKind::Var));
	}

	#[test]
	fn qualified_lookup_reaches_other_classes() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_callable_symbol("make", SymbolKind::Constructor, "Foo", vec!["int".to_string()]);
		scopes.push_class_scope("Bar");

		assert!(scopes.exists("Foo.make", SymbolKind::Function));
		assert_eq!(scopes.parameters_of("Foo.make").unwrap(), vec!["int".to_string()]);
		assert_eq!(scopes.lookup_callable("Foo.make").unwrap().r#type, "Foo");
	}

	#[test]
	fn bare_data_lookup_stops_at_owning_class() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_data_symbol("x", SymbolKind::Field, "int");
		scopes.push_class_scope("Bar");
		// Bar's subroutines must not see Foo's field
		scopes.push_subroutine_scope();
		assert!(scopes.lookup_data("x").is_none());
		assert!(scopes.lookup_data("Foo.x").is_some());
		scopes.pop_subroutine_scope();
	}

	#[test]
	fn subroutine_scope_shadows_class_scope() {
		let mut scopes = stack_with_class("Foo");
		scopes.add_data_symbol("x", SymbolKind::Field, "int");
		scopes.push_subroutine_scope();
		scopes.add_data_symbol("x", SymbolKind::Var, "boolean");
		assert_eq!(scopes.lookup_data("x").unwrap().r#type, "boolean");
		scopes.pop_subroutine_scope();
		assert_eq!(scopes.lookup_data("x").unwrap().r#type, "int");
	}

	#[test]
	fn pre_registration_creates_class_scopes() {
		let mut scopes = ScopeStack::default();
		scopes.add_callable_symbol_to("Math", "multiply", SymbolKind::Function, "int", vec![
			"int".to_string(),
			"int".to_string(),
		]);
		scopes.add_callable_symbol_to("Math", "divide", SymbolKind::Function, "int", vec![
			"int".to_string(),
			"int".to_string(),
		]);
		assert!(scopes.class_defined("Math"));
		assert!(scopes.exists("Math.divide", SymbolKind::Function));
	}
}
