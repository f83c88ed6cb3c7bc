//! Error types for snapshot handling and rehydration
//!
//! Every variant names the exact field, entry, or id that broke the
//! structural guarantee. Rehydration is fail-closed: any of these stops
//! reconstruction outright, with no default substituted and no partially
//! built registrar observable.

use tenet_engine::BuildError;
use thiserror::Error;

/// A snapshot that fails structural validation
///
/// Raised by parsing and by the schema and cross-reference checks that
/// run before any reconstruction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Input is not a snapshot document at all
    #[error("malformed snapshot: {reason}")]
    Malformed {
        /// What the parser refused
        reason: String,
    },

    /// Snapshot serialization failed
    #[error("snapshot serialization failed: {reason}")]
    Serialize {
        /// What the serializer refused
        reason: String,
    },

    /// The version field names a schema this build does not read
    #[error("unsupported snapshot version {found:?}, expected {expected:?}")]
    UnsupportedVersion {
        /// The only version this build reads
        expected: &'static str,
        /// The version the snapshot carries
        found: String,
    },

    /// The mode field names no known engine
    #[error("unknown engine mode {found:?} in snapshot")]
    UnknownMode {
        /// The mode string the snapshot carries
        found: String,
    },

    /// state_ids contains an empty id
    #[error("snapshot state_ids contains an empty id at position {position}")]
    EmptyStateId {
        /// Position of the empty id within state_ids
        position: usize,
    },

    /// state_ids lists the same id twice
    #[error("snapshot state_ids lists {state_id:?} more than once")]
    DuplicateStateId {
        /// The repeated id
        state_id: String,
    },

    /// A listed state id has no lineage entry
    #[error("state {state_id:?} has no lineage entry")]
    MissingLineage {
        /// The id missing from lineage
        state_id: String,
    },

    /// A listed state id has no assigned order index
    #[error("state {state_id:?} has no ordering.assigned entry")]
    MissingAssignment {
        /// The id missing from ordering.assigned
        state_id: String,
    },

    /// lineage keys an id that state_ids does not list
    #[error("lineage entry {state_id:?} does not appear in state_ids")]
    OrphanLineage {
        /// The unlisted lineage key
        state_id: String,
    },

    /// ordering.assigned keys an id that state_ids does not list
    #[error("ordering.assigned entry {state_id:?} does not appear in state_ids")]
    OrphanAssignment {
        /// The unlisted assignment key
        state_id: String,
    },

    /// A lineage parent is not itself a listed state
    #[error("state {state_id:?} names unknown parent {parent:?}")]
    UnknownParent {
        /// The child whose parent link dangles
        state_id: String,
        /// The parent id nothing in the snapshot defines
        parent: String,
    },

    /// An assigned index exceeds what the order counter can represent
    #[error("assigned index {index} for state {state_id:?} exceeds the representable maximum")]
    IndexOutOfRange {
        /// The state carrying the index
        state_id: String,
        /// The out-of-range index
        index: u64,
    },

    /// Two states carry the same order index
    #[error("order index {index} is assigned more than once")]
    DuplicateIndex {
        /// The repeated index
        index: u64,
    },

    /// max_index disagrees with the assigned indices
    #[error("ordering.max_index is {found} but the assigned indices imply {expected}")]
    MaxIndexMismatch {
        /// What the assigned indices imply (-1 for an empty snapshot)
        expected: i64,
        /// What the snapshot claims
        found: i64,
    },

    /// state_ids is not sorted by assigned order index
    #[error(
        "state_ids out of order at position {position}: {state_id:?} has index {index} \
         but follows a state with index {previous}"
    )]
    NonCanonicalOrder {
        /// Position of the offending id within state_ids
        position: usize,
        /// The offending id
        state_id: String,
        /// Its assigned index
        index: u64,
        /// The index assigned to the id before it
        previous: u64,
    },
}

/// A snapshot that cannot become a registrar
///
/// Wraps structural failures and adds the two configuration mismatches
/// that only rehydration can detect, plus engine construction failures
/// for expression-mode invariant sets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RehydrateError {
    /// The snapshot itself is invalid
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The snapshot was produced under a different engine mode
    #[error("snapshot was produced in {found} mode, but {requested} mode was requested")]
    ModeMismatch {
        /// The mode the caller asked for
        requested: String,
        /// The mode recorded in the snapshot
        found: String,
    },

    /// The snapshot was produced under a different invariant registry
    #[error("snapshot registry hash {found:?} does not match the active registry {expected:?}")]
    RegistryMismatch {
        /// Hash of the caller-supplied invariant set
        expected: String,
        /// Hash recorded in the snapshot
        found: String,
    },

    /// The caller-supplied invariant set cannot be compiled
    #[error(transparent)]
    Build(#[from] BuildError),
}
