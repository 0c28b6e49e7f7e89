//! # A single-pass compiler
//!
//! Classic compilers stage their work: scan everything into tokens, parse the
//! tokens into a syntax tree, resolve and type-check the tree, then walk it
//! one last time emitting code. This compiler does all of that in one pass
//! per file. Each grammar production pulls the tokens it needs, checks the
//! semantic rules that can be checked right there, and appends instructions
//! before returning. The syntax tree is never materialised; it exists only as
//! the call stack of the recursive descent.
//!
//! Single-pass compilation has one famous complication: a file may refer to a
//! class that has not been compiled yet, and in a batch whose file order the
//! caller controls there is no "right" order to avoid that. The classic
//! answer, used here, is a work-list. A reference that cannot be validated at
//! the point of use is recorded; when a class finishes compiling, the list is
//! scanned and every reference the class satisfies is checked and removed.
//! Whatever survives the whole batch was never defined anywhere, and that is
//! a compile error at the *original* reference site.
//!
//! What is shared between files is deliberately small: the scope stack (one
//! persistent scope per compiled class, plus a short-lived scope per
//! subroutine body), the work-list, and two counters (static segment offsets
//! and branch label numbers) that must stay unique across the whole run.

pub mod cli;

mod compiler;
mod emitter;
mod error;
mod parser;
mod resolver;
mod symbols;
mod tokenizer;

pub use compiler::Compiler;
pub use emitter::{Instruction, Segment};
pub use error::CompileError;
pub use symbols::SymbolKind;
