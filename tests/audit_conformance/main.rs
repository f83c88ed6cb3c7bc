//! Conformance tests for the audit layer.
//!
//! Snapshot determinism, fail-closed rehydration, and replay parity are
//! guarantees that span crates, so they are proven here against the full
//! public surface rather than in per-module unit tests: take a real
//! registrar, project it, serialize it, tamper with it, rebuild it,
//! replay it.

#[path = "../common/mod.rs"]
mod common;

mod tier1_snapshot_determinism;
mod tier2_rehydration;
mod tier3_replay;
