//! Audit layer for tenet
//!
//! Everything here treats a registrar as evidence:
//! - Snapshot: versioned structural projection of a registrar
//! - Serializer: canonical bytes and corruption checksums
//! - Rehydrator: fail-closed reconstruction from a snapshot
//! - Replay: re-judging a recorded sequence against a fresh registrar
//! - Compare: normalized equivalence of replay reports
//!
//! ```text
//! registrar ──take_snapshot──► SnapshotV1 ──to_canonical_string──► bytes
//!     ▲                                                              │
//!     └───────────────── rehydrate (validate, match, rebuild) ◄──────┘
//!
//! transitions ──replay──► ReplayReport ◄──compare_reports──► ReplayReport
//! ```
//!
//! ## Key Principle
//!
//! The audit layer proves history; it never edits it. Snapshots carry
//! only derivable structure, rehydration refuses anything it cannot
//! prove, and replay reports divergence instead of repairing it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod error;
pub mod rehydrate;
pub mod replay;
pub mod serializer;
pub mod snapshot;

pub use compare::{compare_reports, ReportComparison, ReportDivergence};
pub use error::{RehydrateError, SnapshotError};
pub use rehydrate::{rehydrate, rehydrate_snapshot, RehydrateOptions};
pub use replay::{replay, ReplayOptions, ReplayReport, TransitionOutcome};
pub use serializer::{
    checksum, checksum_hex, parse_snapshot, to_canonical_string, verify_checksum,
};
pub use snapshot::{take_snapshot, OrderingSection, SnapshotV1, SNAPSHOT_VERSION};
