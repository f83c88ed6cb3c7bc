//! Lineage invariant conformance
//!
//! Every state either descends from a registered parent or explicitly
//! claims root; parent chains must resolve without gaps.

use crate::common::*;
use std::collections::BTreeMap;
use tenet::RegisteredState;

#[test]
fn unmarked_root_claim_is_rejected() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        let result = r.register(&bare_root("A"));
        assert!(result.is_rejected(), "mode {mode}");
        assert_violates(&result, &[ids::LINEAGE_EXPLICIT]);
    }
}

#[test]
fn root_marker_must_be_boolean_true() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        let marked_with_int = State::new("A").with_field("isRoot", 1i64);
        let result = r.register(&Transition::root(marked_with_int));
        assert!(result.is_rejected(), "mode {mode}");
        assert_violates(&result, &[ids::LINEAGE_EXPLICIT]);

        let marked_false = State::new("B").with_field("isRoot", false);
        let result = r.register(&Transition::root(marked_false));
        assert_violates(&result, &[ids::LINEAGE_EXPLICIT]);
    }
}

#[test]
fn unknown_parent_halts_with_both_lineage_rules() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        // Same id on both ends keeps identity rules out of the picture
        let result = r.register(&update("Missing", "Missing"));
        assert!(result.is_halted(), "mode {mode}");
        assert_violates(
            &result,
            &[ids::LINEAGE_CONTINUOUS, ids::LINEAGE_PARENT_EXISTS],
        );
    }
}

#[test]
fn registered_parent_satisfies_lineage() {
    for mode in BOTH_MODES {
        let mut r = registrar_with(mode, &[root("A")]);
        assert!(r.register(&update("A", "A")).is_accepted(), "mode {mode}");
        assert_eq!(r.get_lineage("A"), vec![StateId::new("A")]);
    }
}

#[test]
fn single_parent_never_fires_through_the_data_model() {
    // The transition type admits exactly one parent; the rule stays
    // declared and is re-verified on every registration
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        for transition in mixed_sequence() {
            let violated = r.register(&transition).violated_ids();
            assert!(
                !violated.contains(&ids::LINEAGE_SINGLE_PARENT.to_string()),
                "mode {mode}"
            );
        }
    }
}

#[test]
fn continuity_holds_across_restored_chains() {
    // Chains longer than live registration can build still walk cleanly
    for mode in BOTH_MODES {
        let mut states = BTreeMap::new();
        states.insert(StateId::new("A"), RegisteredState::new(None, 0));
        states.insert(
            StateId::new("B"),
            RegisteredState::new(Some(StateId::new("A")), 1),
        );
        states.insert(
            StateId::new("C"),
            RegisteredState::new(Some(StateId::new("B")), 2),
        );
        let mut r = Registrar::restore(mode, builtin_invariants(), states, 3).unwrap();
        assert_eq!(
            r.get_lineage("C"),
            vec![StateId::new("C"), StateId::new("B"), StateId::new("A")]
        );

        // Extending the tip passes the chain walk
        let result = r.register(&update("C", "C"));
        assert!(result.is_accepted(), "mode {mode}");
        assert_eq!(result.order_index(), Some(3));
    }
}
