//! Identity invariant conformance
//!
//! Ids must be explicit (non-empty), immutable across a transition, and
//! unique among root registrations.

use crate::common::*;

#[test]
fn empty_id_is_rejected() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        // The marker is present, so only the id violates
        let result = r.register(&Transition::root(State::root("")));
        assert!(result.is_rejected(), "mode {mode}");
        assert_violates(&result, &[ids::IDENTITY_EXPLICIT]);
    }
}

#[test]
fn non_empty_id_is_explicit() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        assert!(r.register(&root("S1")).is_accepted(), "mode {mode}");
    }
}

#[test]
fn changing_id_mid_transition_is_rejected() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        let result = r.register(&update("A", "B"));
        assert!(result.is_rejected(), "mode {mode}");
        assert_violates(&result, &[ids::IDENTITY_IMMUTABLE]);
    }
}

#[test]
fn same_id_update_is_immutable() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        let result = r.register(&update("A", "A"));
        assert!(result.is_accepted(), "mode {mode}");
        assert_eq!(result.order_index(), Some(1));
    }
}

#[test]
fn duplicate_root_claim_halts() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        let result = r.register(&root("A"));
        assert!(result.is_halted(), "mode {mode}");
        assert_violates(&result, &[ids::IDENTITY_UNIQUE]);

        // A halt marks the proposal, not the registrar
        assert!(r.register(&root("B")).is_accepted(), "mode {mode}");
    }
}

#[test]
fn root_claim_over_updated_id_halts() {
    // Uniqueness guards the whole registered set, not just prior roots
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A"), update("A", "A")]);
        let result = r.register(&root("A"));
        assert!(result.is_halted(), "mode {mode}");
        assert_violates(&result, &[ids::IDENTITY_UNIQUE]);
    }
}

#[test]
fn updates_reuse_ids_freely() {
    // Re-registering an id through its own lineage is the versioning path
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        for expected in 1..5u64 {
            let result = r.register(&update("A", "A"));
            assert_eq!(result.order_index(), Some(expected), "mode {mode}");
        }
        assert_eq!(r.state_count(), 1);
    }
}
