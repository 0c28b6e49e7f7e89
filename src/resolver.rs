//! Cross-file forward references.
//!
//! Files compile in whatever order the driver supplies them, so a class may
//! call into a class that has not been compiled yet. Such uses cannot be
//! validated at the point they are seen; they go onto a work-list instead and
//! are checked off when the defining class finishes compiling. Whatever is
//! still on the list once every file has been processed was never defined
//! anywhere, and the earliest-registered leftover is reported.

use crate::{
	error::resolver::ResolveError,
	symbols::{is_builtin_type, types_compatible, ScopeStack, SymbolKind},
};

/// A symbol use that could not be validated when it was seen
#[derive(Debug, Clone)]
pub struct PendingReference {
	/// Bare class name, or `Class.subroutine` for calls
	pub name:       String,
	/// File the reference appeared in
	pub file:       String,
	/// Line the reference appeared on
	pub line:       usize,
	/// What the reference expects the name to be
	pub kind:       SymbolKind,
	/// Argument types to validate against the declaration, for calls
	pub parameters: Option<Vec<String>>,
}

/// Work-list of references waiting for their defining class
#[derive(Debug, Default)]
pub struct Resolver {
	pending: Vec<PendingReference>,
}

impl Resolver {
	/// Record a reference unless it is already resolvable. Returns true when
	/// the name was findable (or primitive) and nothing was recorded.
	pub fn register(&mut self, reference: PendingReference, scopes: &ScopeStack) -> bool {
		if is_builtin_type(&reference.name) {
			return true;
		}
		if scopes.exists(&reference.name, reference.kind) {
			return true;
		}
		self.pending.push(reference);
		false
	}

	/// Check off every pending reference the just-finished class defines,
	/// validating deferred argument lists against the now-known declarations.
	/// Disambiguation is kind-then-name: a class-kind entry only matches the
	/// class name itself, a callable entry only matches its subroutines.
	pub fn resolve_for_class(&mut self, class_name: &str, scopes: &ScopeStack) -> Result<(), ResolveError> {
		let mut remaining = Vec::with_capacity(self.pending.len());
		for entry in self.pending.drain(..) {
			let defined = match entry.kind {
				SymbolKind::Class => entry.name == class_name,
				kind => entry
					.name
					.split_once('.')
					.is_some_and(|(class, _)| class == class_name && scopes.exists(&entry.name, kind)),
			};
			if !defined {
				remaining.push(entry);
				continue;
			}
			if let Some(arguments) = &entry.parameters {
				let Some(parameters) = scopes.parameters_of(&entry.name) else {
					return Err(ResolveError::NotCallable { name: entry.name, file: entry.file, line: entry.line });
				};
				if parameters.len() != arguments.len() {
					return Err(ResolveError::ArityMismatch {
						name:     entry.name,
						file:     entry.file,
						line:     entry.line,
						expected: parameters.len(),
						found:    arguments.len(),
					});
				}
				for (position, (expected, found)) in parameters.iter().zip(arguments).enumerate() {
					if !types_compatible(expected, found) {
						return Err(ResolveError::ArgumentMismatch {
							name:     entry.name,
							file:     entry.file,
							line:     entry.line,
							position: position + 1,
							expected: expected.clone(),
							found:    found.clone(),
						});
					}
				}
			}
		}
		self.pending = remaining;
		Ok(())
	}

	/// The work-list must be empty once every file has been compiled; the
	/// earliest-registered leftover is the one reported.
	pub fn assert_all_resolved(&self) -> Result<(), ResolveError> {
		match self.pending.first() {
			None => Ok(()),
			Some(entry) => Err(ResolveError::Unresolved {
				name: entry.name.clone(),
				file: entry.file.clone(),
				line: entry.line,
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn reference(name: &str, kind: SymbolKind, parameters: Option<Vec<String>>) -> PendingReference {
		PendingReference { name: name.to_string(), file: "Test.jack".to_string(), line: 7, kind, parameters }
	}

	#[test]
	fn primitive_types_never_register() {
		let scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		assert!(resolver.register(reference("int", SymbolKind::Class, None), &scopes));
		assert!(resolver.assert_all_resolved().is_ok());
	}

	#[test]
	fn known_names_never_register() {
		let mut scopes = ScopeStack::default();
		scopes.push_class_scope("Point");
		let mut resolver = Resolver::default();
		assert!(resolver.register(reference("Point", SymbolKind::Class, None), &scopes));
	}

	#[test]
	fn unknown_names_defer_until_their_class_finishes() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		assert!(!resolver.register(reference("Point", SymbolKind::Class, None), &scopes));
		assert!(resolver.assert_all_resolved().is_err());

		scopes.push_class_scope("Point");
		resolver.resolve_for_class("Point", &scopes).unwrap();
		assert!(resolver.assert_all_resolved().is_ok());
	}

	#[test]
	fn deferred_calls_validate_arity_on_resolution() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		let arguments = Some(vec!["int".to_string(), "int".to_string()]);
		assert!(!resolver.register(reference("Point.new", SymbolKind::Function, arguments), &scopes));

		scopes.push_class_scope("Point");
		scopes.add_callable_symbol("new", SymbolKind::Constructor, "Point", vec!["int".to_string()]);
		let error = resolver.resolve_for_class("Point", &scopes).unwrap_err();
		assert!(error.to_string().contains("expects 1 arguments but 2 were supplied"), "{error}");
		assert!(error.to_string().contains("Test.jack"), "{error}");
	}

	#[test]
	fn deferred_calls_accept_compatible_argument_types() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		let arguments = Some(vec!["char".to_string(), "any".to_string()]);
		resolver.register(reference("Point.new", SymbolKind::Function, arguments), &scopes);

		scopes.push_class_scope("Point");
		scopes.add_callable_symbol("new", SymbolKind::Constructor, "Point", vec![
			"int".to_string(),
			"boolean".to_string(),
		]);
		resolver.resolve_for_class("Point", &scopes).unwrap();
		assert!(resolver.assert_all_resolved().is_ok());
	}

	#[test]
	fn kind_disambiguates_entries_sharing_a_name() {
		let mut scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		// a class named Point and an unrelated call Point.of are distinct entries
		resolver.register(reference("Point", SymbolKind::Class, None), &scopes);
		resolver.register(reference("Point.of", SymbolKind::Function, Some(Vec::new())), &scopes);

		scopes.push_class_scope("Point");
		resolver.resolve_for_class("Point", &scopes).unwrap();
		// the class reference resolved; the call did not
		let error = resolver.assert_all_resolved().unwrap_err();
		assert!(error.to_string().contains("Point.of"), "{error}");
	}

	#[test]
	fn earliest_registered_leftover_is_reported() {
		let scopes = ScopeStack::default();
		let mut resolver = Resolver::default();
		resolver.register(reference("First", SymbolKind::Class, None), &scopes);
		resolver.register(reference("Second", SymbolKind::Class, None), &scopes);
		let error = resolver.assert_all_resolved().unwrap_err();
		assert!(error.to_string().contains("'First'"), "{error}");
	}
}
