//! Registration engine for tenet
//!
//! This crate owns the registrar and everything it evaluates:
//! - Builtin invariants: the 11 structural rules, in native and
//!   expression form
//! - CompiledRegistry: the expression-engine counterpart of an
//!   invariant set
//! - Registrar: registration, validation, lineage, and ordering
//!
//! The engine is the only component that knows about:
//! - Order index assignment
//! - Scope-based context construction
//! - Halt/reject outcome classification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod compiled;
pub mod error;
pub mod registrar;

pub use builtin::{builtin_invariants, ids};
pub use compiled::CompiledRegistry;
pub use error::BuildError;
pub use registrar::{registry_hash_for, RegisteredState, Registrar, ValidationTarget};
