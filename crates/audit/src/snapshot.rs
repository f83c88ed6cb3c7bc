//! Versioned snapshot schema and structural validation
//!
//! ## Shape
//!
//! ```text
//! SnapshotV1
//! ├── lineage        map: state id → parent id or null
//! ├── mode           "native" | "dsl"
//! ├── ordering
//! │   ├── assigned   map: state id → order index
//! │   └── max_index  highest assigned index, -1 when empty
//! ├── registry_hash  identity of the invariant set that judged the states
//! ├── state_ids      every registered id, ascending by order index
//! └── version        "1.0"
//! ```
//!
//! A snapshot carries only structural, derivable fields. No payloads, no
//! timestamps, no caches: two registrars that accepted the same sequence
//! produce equal snapshots.
//!
//! ## Key Principle
//!
//! Snapshots are **projections**, not authorities. [`SnapshotV1::validate`]
//! re-proves every cross-reference before anything is rebuilt from one;
//! a snapshot that fails a single check rebuilds nothing.

use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tenet_core::{EngineMode, StateId};
use tenet_engine::Registrar;

/// The only snapshot schema version this build reads or writes
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Order-index section of a snapshot
///
/// Field declaration order is lexicographic so the derived serializer
/// emits canonical key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderingSection {
    /// Order index of every registered state, keyed by id
    pub assigned: BTreeMap<StateId, u64>,
    /// Highest assigned index, -1 when no state is registered
    pub max_index: i64,
}

/// Complete structural projection of a registrar
///
/// Field declaration order is lexicographic so the derived serializer
/// emits canonical key order; map keys sort through `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotV1 {
    /// Parent pointer of every registered state, null for roots
    pub lineage: BTreeMap<StateId, Option<StateId>>,
    /// Engine mode the registrar ran, `"native"` or `"dsl"`
    pub mode: String,
    /// Order index assignments
    pub ordering: OrderingSection,
    /// Identity of the invariant registry, mode-prefixed
    pub registry_hash: String,
    /// Registered ids, ascending by order index
    pub state_ids: Vec<StateId>,
    /// Schema version, always [`SNAPSHOT_VERSION`]
    pub version: String,
}

impl SnapshotV1 {
    /// The engine mode this snapshot was produced under
    pub fn engine_mode(&self) -> Result<EngineMode, SnapshotError> {
        EngineMode::from_mode_str(&self.mode).ok_or_else(|| SnapshotError::UnknownMode {
            found: self.mode.clone(),
        })
    }

    /// Prove the snapshot internally consistent
    ///
    /// Checks, in order: schema version, known mode, id well-formedness,
    /// bijection between `state_ids`, `lineage`, and `ordering.assigned`,
    /// parent resolvability, index uniqueness and range, `max_index`
    /// agreement, and canonical `state_ids` order. First failure wins;
    /// nothing is coerced or defaulted.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                expected: SNAPSHOT_VERSION,
                found: self.version.clone(),
            });
        }
        self.engine_mode()?;

        let mut listed: BTreeSet<&StateId> = BTreeSet::new();
        for (position, id) in self.state_ids.iter().enumerate() {
            if id.is_empty() {
                return Err(SnapshotError::EmptyStateId { position });
            }
            if !listed.insert(id) {
                return Err(SnapshotError::DuplicateStateId {
                    state_id: id.as_str().to_string(),
                });
            }
            if !self.lineage.contains_key(id) {
                return Err(SnapshotError::MissingLineage {
                    state_id: id.as_str().to_string(),
                });
            }
            if !self.ordering.assigned.contains_key(id) {
                return Err(SnapshotError::MissingAssignment {
                    state_id: id.as_str().to_string(),
                });
            }
        }
        for key in self.lineage.keys() {
            if !listed.contains(key) {
                return Err(SnapshotError::OrphanLineage {
                    state_id: key.as_str().to_string(),
                });
            }
        }
        for key in self.ordering.assigned.keys() {
            if !listed.contains(key) {
                return Err(SnapshotError::OrphanAssignment {
                    state_id: key.as_str().to_string(),
                });
            }
        }
        for (child, parent) in &self.lineage {
            if let Some(parent) = parent {
                if !listed.contains(parent) {
                    return Err(SnapshotError::UnknownParent {
                        state_id: child.as_str().to_string(),
                        parent: parent.as_str().to_string(),
                    });
                }
            }
        }

        let mut seen_indices: BTreeSet<u64> = BTreeSet::new();
        let mut implied_max: i64 = -1;
        for (id, &index) in &self.ordering.assigned {
            let signed = i64::try_from(index).map_err(|_| SnapshotError::IndexOutOfRange {
                state_id: id.as_str().to_string(),
                index,
            })?;
            if !seen_indices.insert(index) {
                return Err(SnapshotError::DuplicateIndex { index });
            }
            implied_max = implied_max.max(signed);
        }
        if self.ordering.max_index != implied_max {
            return Err(SnapshotError::MaxIndexMismatch {
                expected: implied_max,
                found: self.ordering.max_index,
            });
        }

        let mut previous: Option<u64> = None;
        for (position, id) in self.state_ids.iter().enumerate() {
            if let Some(&index) = self.ordering.assigned.get(id) {
                if let Some(previous_index) = previous {
                    if index <= previous_index {
                        return Err(SnapshotError::NonCanonicalOrder {
                            position,
                            state_id: id.as_str().to_string(),
                            index,
                            previous: previous_index,
                        });
                    }
                }
                previous = Some(index);
            }
        }
        Ok(())
    }
}

/// Project a registrar's structural state into the versioned schema
///
/// Pure read: the registrar is never mutated, and the snapshot shares no
/// storage with it.
pub fn take_snapshot(registrar: &Registrar) -> SnapshotV1 {
    let mut lineage = BTreeMap::new();
    let mut assigned = BTreeMap::new();
    let mut by_index: Vec<(u64, StateId)> = Vec::new();
    for (id, entry) in registrar.states() {
        lineage.insert(id.clone(), entry.parent().cloned());
        assigned.insert(id.clone(), entry.order_index());
        by_index.push((entry.order_index(), id.clone()));
    }
    by_index.sort_by_key(|(index, _)| *index);

    SnapshotV1 {
        lineage,
        mode: registrar.mode().as_str().to_string(),
        ordering: OrderingSection {
            assigned,
            max_index: registrar.max_assigned_index(),
        },
        registry_hash: registrar.registry_hash(),
        state_ids: by_index.into_iter().map(|(_, id)| id).collect(),
        version: SNAPSHOT_VERSION.to_string(),
    }
}
