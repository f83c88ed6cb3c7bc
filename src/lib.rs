//! Tenet - Deterministic structural invariant engine
//!
//! Tenet judges proposed state transitions against an explicit, declared
//! invariant registry. Every registration is classified Accepted,
//! Rejected, or Halted; every acceptance receives a monotonic order
//! index; and the whole history can be snapshotted, rehydrated, and
//! replayed byte-for-byte.
//!
//! # Quick Start
//!
//! ```
//! use tenet::{EngineMode, Registrar, State, Transition};
//!
//! # fn main() -> Result<(), tenet::BuildError> {
//! // A registrar over the builtin invariants, native engine
//! let mut registrar = Registrar::new(EngineMode::Native)?;
//!
//! // Register a root state
//! let result = registrar.register(&Transition::root(State::root("S1")));
//! assert_eq!(result.order_index(), Some(0));
//!
//! // Extend it with a new version
//! let result = registrar.register(&Transition::update("S1", State::new("S1")));
//! assert_eq!(result.order_index(), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Evaluation runs through one of two engines chosen at construction:
//! native predicate closures, or expressions compiled from the invariant
//! language. Both judge identically; the conformance suites prove it.
//! The audit layer ([`take_snapshot`], [`rehydrate`], [`replay`]) treats
//! a registrar as evidence and never feeds back into registration.

// Re-export the public API from the member crates
pub use tenet_audit::{
    checksum, checksum_hex, compare_reports, parse_snapshot, rehydrate, rehydrate_snapshot,
    replay, take_snapshot, to_canonical_string, verify_checksum, OrderingSection, RehydrateError,
    RehydrateOptions, ReplayOptions, ReplayReport, ReportComparison, ReportDivergence,
    SnapshotError, SnapshotV1, TransitionOutcome, SNAPSHOT_VERSION,
};
pub use tenet_core::{
    EngineMode, EvalContext, FailureMode, Invariant, InvariantDescriptor, InvariantSet,
    InvariantSetError, NativePredicate, OrderingInfo, OutcomeKind, RegistrationResult,
    RegistryQuery, Scope, State, StateId, StructureValue, Transition, ValidationReport, Violation,
    ROOT_MARKER,
};
pub use tenet_dsl::{compile, CompileError, CompiledExpr, ParseError, ValidationError};
pub use tenet_engine::{
    builtin_invariants, ids, registry_hash_for, BuildError, CompiledRegistry, RegisteredState,
    Registrar, ValidationTarget,
};
