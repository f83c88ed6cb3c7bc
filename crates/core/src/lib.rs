//! Core types for Tenet
//!
//! This crate defines the foundational types used throughout the system:
//! - StateId: Caller-assigned identifier for states
//! - State / Transition: the proposals the registrar judges
//! - StructureValue: scalar values for structural (non-semantic) fields
//! - Invariant / InvariantSet: declared rules, carried in two forms
//! - EvalContext: the three context shapes invariants are evaluated against
//! - RegistrationResult / ValidationReport: outcomes as data, never errors
//! - Stable hashing: the portable non-cryptographic hash the wire format uses

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod hash;
pub mod invariant;
pub mod result;
pub mod state;
pub mod types;

// Re-export commonly used types at the crate root
pub use context::{EvalContext, OrderingInfo, RegistryQuery};
pub use invariant::{
    FailureMode, Invariant, InvariantDescriptor, InvariantSet, InvariantSetError, NativePredicate,
    Scope, Violation,
};
pub use result::{OutcomeKind, RegistrationResult, ValidationReport};
pub use state::{State, StructureValue, Transition, ROOT_MARKER};
pub use types::{EngineMode, StateId};
