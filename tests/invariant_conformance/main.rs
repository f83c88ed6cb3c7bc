//! Conformance tests for the builtin invariants and the registrar.
//!
//! Unit tests in crates/core and crates/engine cover each module in
//! isolation. These suites exercise the guarantees end to end, under
//! both evaluation engines: per-invariant classification, violation
//! reporting, order index assignment, cross-engine parity, and the
//! public registrar surface.

#[path = "../common/mod.rs"]
mod common;

mod tier1_identity_invariants;
mod tier2_lineage_invariants;
mod tier5_registrar_api;
