//! Registrar public API conformance
//!
//! The documented end-to-end scenario plus the read-only surface:
//! validate, list_invariants, get_lineage.

use crate::common::*;
use std::collections::BTreeMap;
use tenet::RegisteredState;

#[test]
fn documented_acceptance_scenario() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);

        // A fresh root on an empty registrar
        let result = r.register(&Transition::root(State::root("S1")));
        assert!(result.is_accepted(), "mode {mode}");
        assert_eq!(result.state_id().map(StateId::as_str), Some("S1"));
        assert_eq!(result.order_index(), Some(0));

        // The identical claim again: duplicate root id
        let result = r.register(&Transition::root(State::root("S1")));
        assert!(result.is_halted(), "mode {mode}");
        assert_violates(&result, &[ids::IDENTITY_UNIQUE]);

        // A new version of S1 through its own lineage
        let versioned = Transition::update("S1", State::new("S1").with_field("v", 2i64));
        let result = r.register(&versioned);
        assert!(result.is_accepted(), "mode {mode}");
        assert_eq!(result.order_index(), Some(1));

        // A transition from a parent nothing registered
        let result = r.register(&update("Missing", "X"));
        assert!(result.is_halted(), "mode {mode}");
        let violated = result.violated_ids();
        assert!(violated.contains(&ids::LINEAGE_PARENT_EXISTS.to_string()));
        assert!(violated.contains(&ids::LINEAGE_CONTINUOUS.to_string()));
    }
}

#[test]
fn validate_judges_without_registering() {
    for mode in BOTH_MODES {
        let mut r = registrar(mode);
        r.register(&root("S1"));

        // Registration-scoped rules are out of scope for validation, so
        // a duplicate root claim validates cleanly
        let report = r.validate(ValidationTarget::Transition(&root("S1")));
        assert!(report.valid, "mode {mode}");

        // Transition-scoped rules still judge
        let report = r.validate(ValidationTarget::Transition(&bare_root("B")));
        assert!(!report.valid);
        assert_eq!(report.violated_ids(), vec![ids::LINEAGE_EXPLICIT]);

        // A bare state sees state-scoped rules only
        let report = r.validate(ValidationTarget::State(&State::new("")));
        assert_eq!(report.violated_ids(), vec![ids::IDENTITY_EXPLICIT]);

        // Nothing registered, nothing counted
        assert_eq!(r.state_count(), 1, "mode {mode}");
        assert_eq!(r.next_index(), 1);
    }
}

#[test]
fn list_invariants_exposes_descriptors_only() {
    for mode in BOTH_MODES {
        let r = registrar(mode);

        let all = r.list_invariants(None);
        assert_eq!(all.len(), 11, "mode {mode}");
        let listed: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(listed, ids::ALL);

        let registration = r.list_invariants(Some(Scope::Registration));
        assert_eq!(registration.len(), 7);
        assert!(registration.iter().all(|d| d.scope == Scope::Registration));

        let state_scoped = r.list_invariants(Some(Scope::State));
        assert_eq!(state_scoped.len(), 1);
        assert_eq!(state_scoped[0].id, ids::IDENTITY_EXPLICIT);
        assert_eq!(state_scoped[0].failure_mode, FailureMode::Reject);
        assert_eq!(state_scoped[0].applies_to, vec!["id".to_string()]);
        assert!(!state_scoped[0].description.is_empty());
    }
}

#[test]
fn lineage_walks_newest_to_oldest() {
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
        let r = Registrar::restore(mode, builtin_invariants(), states, 3).unwrap();

        assert_eq!(
            r.get_lineage("C"),
            vec![StateId::new("C"), StateId::new("B"), StateId::new("A")],
            "mode {mode}"
        );
        assert_eq!(r.get_lineage("A"), vec![StateId::new("A")]);
        assert_eq!(r.get_lineage("nowhere"), Vec::<StateId>::new());
    }
}

#[test]
fn lineage_terminates_on_cycles() {
    // A hand-built cycle cannot arise from live registration; the walk
    // must still terminate with the partial trace
    let mut states = BTreeMap::new();
    states.insert(
        StateId::new("A"),
        RegisteredState::new(Some(StateId::new("B")), 0),
    );
    states.insert(
        StateId::new("B"),
        RegisteredState::new(Some(StateId::new("A")), 1),
    );
    let r = Registrar::restore(EngineMode::Native, builtin_invariants(), states, 2).unwrap();

    assert_eq!(
        r.get_lineage("A"),
        vec![StateId::new("A"), StateId::new("B")]
    );
    assert_eq!(
        r.get_lineage("B"),
        vec![StateId::new("B"), StateId::new("A")]
    );
}

#[test]
fn lineage_stops_at_dangling_links() {
    // A parent outside the registered set ends the trace
    let mut states = BTreeMap::new();
    states.insert(
        StateId::new("B"),
        RegisteredState::new(Some(StateId::new("gone")), 0),
    );
    let r = Registrar::restore(EngineMode::Native, builtin_invariants(), states, 1).unwrap();
    assert_eq!(r.get_lineage("B"), vec![StateId::new("B")]);
}
