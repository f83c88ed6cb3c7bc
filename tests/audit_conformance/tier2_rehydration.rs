//! Fail-closed rehydration
//!
//! Every structural defect, version drift, mode mismatch, and registry
//! mismatch must refuse with its own error, and a refused rehydration
//! must leave nothing usable behind.

use crate::common::*;
use std::sync::Arc;
use tenet::{Invariant, InvariantSet};

fn snapshot_of(mode: EngineMode) -> SnapshotV1 {
    take_snapshot(&registrar_with(mode, &mixed_sequence()))
}

fn expect_snapshot_error(snapshot: SnapshotV1) -> SnapshotError {
    match rehydrate_snapshot(&snapshot, &RehydrateOptions::new(EngineMode::Native)) {
        Err(RehydrateError::Snapshot(err)) => err,
        Err(other) => panic!("expected a snapshot validation failure, got {other:?}"),
        Ok(_) => panic!("expected a snapshot validation failure, got a registrar"),
    }
}

#[test]
fn valid_snapshot_rebuilds_equivalent_registrar() {
    for mode in BOTH_MODES {
        let original = registrar_with(mode, &mixed_sequence());
        let raw = to_canonical_string(&take_snapshot(&original)).unwrap();

        let mut rebuilt = rehydrate(&raw, &RehydrateOptions::new(mode)).unwrap();
        assert_eq!(rebuilt.state_count(), original.state_count(), "mode {mode}");
        assert_eq!(rebuilt.next_index(), original.next_index());
        assert_eq!(rebuilt.registry_hash(), original.registry_hash());
        assert_eq!(rebuilt.get_lineage("A"), original.get_lineage("A"));

        // The counter continues where history left off
        assert_eq!(rebuilt.register(&root("C")).order_index(), Some(4));
        // The restored set still guards uniqueness
        assert!(rebuilt.register(&root("A")).is_halted());
    }
}

#[test]
fn non_document_input_refuses() {
    for raw in ["", "not json", "[]", "42", "{}"] {
        let err = rehydrate(raw, &RehydrateOptions::new(EngineMode::Native)).unwrap_err();
        assert!(
            matches!(err, RehydrateError::Snapshot(SnapshotError::Malformed { .. })),
            "input {raw:?} produced {err:?}"
        );
    }
}

#[test]
fn unknown_fields_refuse_at_parse_time() {
    let raw = to_canonical_string(&snapshot_of(EngineMode::Native)).unwrap();

    let top_level = raw.replacen("{\"lineage\"", "{\"annotations\":{},\"lineage\"", 1);
    assert!(matches!(
        rehydrate(&top_level, &RehydrateOptions::new(EngineMode::Native)),
        Err(RehydrateError::Snapshot(SnapshotError::Malformed { .. }))
    ));

    let nested = raw.replacen("\"max_index\"", "\"padding\":0,\"max_index\"", 1);
    assert!(matches!(
        rehydrate(&nested, &RehydrateOptions::new(EngineMode::Native)),
        Err(RehydrateError::Snapshot(SnapshotError::Malformed { .. }))
    ));
}

#[test]
fn wrong_version_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.version = "0.9".to_string();
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::UnsupportedVersion {
            expected: "1.0",
            found: "0.9".to_string(),
        }
    );
}

#[test]
fn unknown_mode_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.mode = "oracle".to_string();
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::UnknownMode {
            found: "oracle".to_string(),
        }
    );
}

#[test]
fn empty_state_id_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.state_ids[0] = StateId::new("");
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::EmptyStateId { position: 0 }
    );
}

#[test]
fn duplicated_state_id_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.state_ids.push(StateId::new("A"));
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::DuplicateStateId {
            state_id: "A".to_string(),
        }
    );
}

#[test]
fn missing_lineage_entry_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.lineage.remove(&StateId::new("B"));
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::MissingLineage {
            state_id: "B".to_string(),
        }
    );
}

#[test]
fn missing_assignment_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.ordering.assigned.remove(&StateId::new("B"));
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::MissingAssignment {
            state_id: "B".to_string(),
        }
    );
}

#[test]
fn orphan_lineage_entry_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.lineage.insert(StateId::new("ghost"), None);
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::OrphanLineage {
            state_id: "ghost".to_string(),
        }
    );
}

#[test]
fn orphan_assignment_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.ordering.assigned.insert(StateId::new("ghost"), 9);
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::OrphanAssignment {
            state_id: "ghost".to_string(),
        }
    );
}

#[test]
fn unknown_parent_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot
        .lineage
        .insert(StateId::new("B"), Some(StateId::new("ghost")));
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::UnknownParent {
            state_id: "B".to_string(),
            parent: "ghost".to_string(),
        }
    );
}

#[test]
fn duplicate_index_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.ordering.assigned.insert(StateId::new("B"), 1);
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::DuplicateIndex { index: 1 }
    );
}

#[test]
fn max_index_disagreement_refuses() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.ordering.max_index = 2;
    assert_eq!(
        expect_snapshot_error(snapshot),
        SnapshotError::MaxIndexMismatch {
            expected: 3,
            found: 2,
        }
    );
}

#[test]
fn unsorted_state_ids_refuse() {
    let mut snapshot = snapshot_of(EngineMode::Native);
    snapshot.state_ids.reverse();
    assert!(matches!(
        expect_snapshot_error(snapshot),
        SnapshotError::NonCanonicalOrder { position: 1, .. }
    ));
}

#[test]
fn mode_mismatch_refuses() {
    for (produced, requested) in [
        (EngineMode::Native, EngineMode::Dsl),
        (EngineMode::Dsl, EngineMode::Native),
    ] {
        let raw = to_canonical_string(&snapshot_of(produced)).unwrap();
        let err = rehydrate(&raw, &RehydrateOptions::new(requested)).unwrap_err();
        assert_eq!(
            err,
            RehydrateError::ModeMismatch {
                requested: requested.as_str().to_string(),
                found: produced.as_str().to_string(),
            }
        );
    }
}

#[test]
fn different_invariant_set_refuses() {
    let raw = to_canonical_string(&snapshot_of(EngineMode::Native)).unwrap();

    let reduced = InvariantSet::new(vec![Invariant::new(
        "state.identity.explicit",
        Scope::State,
        FailureMode::Reject,
        "State id must be a non-empty string",
        Arc::new(|ctx| !ctx.state().id().as_str().is_empty()),
        Some("is_string(state.id) && non_empty(state.id)".to_string()),
    )])
    .unwrap();

    let options = RehydrateOptions::with_invariants(EngineMode::Native, reduced);
    let err = rehydrate(&raw, &options).unwrap_err();
    assert!(matches!(err, RehydrateError::RegistryMismatch { .. }));
}

#[test]
fn failure_leaves_no_partial_registrar() {
    // The same options value keeps working after refusals, and the same
    // raw text still rehydrates once the right options arrive
    let raw = to_canonical_string(&snapshot_of(EngineMode::Dsl)).unwrap();
    let wrong = RehydrateOptions::new(EngineMode::Native);
    let right = RehydrateOptions::new(EngineMode::Dsl);

    assert!(rehydrate(&raw, &wrong).is_err());
    assert!(rehydrate("not a snapshot", &right).is_err());
    let rebuilt = rehydrate(&raw, &right).unwrap();
    assert_eq!(rebuilt.state_count(), 2);
}
