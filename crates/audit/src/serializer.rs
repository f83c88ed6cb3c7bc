//! Canonical snapshot serialization and corruption checksums
//!
//! ## Determinism
//!
//! One structural state, one byte sequence. Struct fields are declared in
//! lexicographic order and every map is a `BTreeMap`, so the derived
//! serializer emits canonically ordered keys; output is compact UTF-8
//! with no trailing whitespace and no floats. Identical registrars
//! serialize to identical bytes on any host.
//!
//! ## Key Principle
//!
//! The checksum is djb2 over the canonical bytes: fast corruption
//! detection, nothing more. Consumers needing tamper-evidence compute
//! their own cryptographic digest over the same bytes; this module never
//! stands in for one.

use crate::error::SnapshotError;
use crate::snapshot::SnapshotV1;
use tenet_core::hash::{djb2_64, hex16};

/// Serialize a snapshot to its canonical byte-for-byte form
pub fn to_canonical_string(snapshot: &SnapshotV1) -> Result<String, SnapshotError> {
    serde_json::to_string(snapshot).map_err(|e| SnapshotError::Serialize {
        reason: e.to_string(),
    })
}

/// Parse a snapshot document, strictly
///
/// Unknown fields, missing fields, wrong shapes, and non-snapshot input
/// all refuse here. Structural cross-references are a separate concern,
/// proven by [`SnapshotV1::validate`].
pub fn parse_snapshot(raw: &str) -> Result<SnapshotV1, SnapshotError> {
    serde_json::from_str(raw).map_err(|e| SnapshotError::Malformed {
        reason: e.to_string(),
    })
}

/// Corruption checksum over canonical snapshot text
pub fn checksum(canonical: &str) -> u64 {
    djb2_64(canonical.as_bytes())
}

/// Checksum in fixed-width hex, for logs and sidecar files
pub fn checksum_hex(canonical: &str) -> String {
    hex16(checksum(canonical))
}

/// Whether canonical text still matches a previously computed checksum
pub fn verify_checksum(canonical: &str, expected: u64) -> bool {
    checksum(canonical) == expected
}
