/// Errors detected when a deferred reference meets its definition, or fails to.
/// Every variant reports the file and line of the original reference, not the
/// point where the mismatch was discovered.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
	/// A referenced symbol was never defined by any compiled file
	#[error("(LINE {line}) (IN FILE '{file}') The symbol '{name}' is never defined")]
	Unresolved { name: String, file: String, line: usize },
	/// A deferred call supplied the wrong number of arguments
	#[error("(LINE {line}) (IN FILE '{file}') The subroutine '{name}' expects {expected} arguments but {found} were supplied")]
	ArityMismatch { name: String, file: String, line: usize, expected: usize, found: usize },
	/// A deferred call supplied an argument of the wrong type
	#[error("(LINE {line}) (IN FILE '{file}') Argument {position} of '{name}' expects type '{expected}' but '{found}' was supplied")]
	ArgumentMismatch { name: String, file: String, line: usize, position: usize, expected: String, found: String },
	/// A deferred call resolved to a symbol that is not a subroutine
	#[error("(LINE {line}) (IN FILE '{file}') '{name}' is not a subroutine")]
	NotCallable { name: String, file: String, line: usize },
}
