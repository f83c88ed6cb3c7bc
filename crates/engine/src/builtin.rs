//! The builtin invariant set
//!
//! Eleven invariants in three groups: identity, lineage, ordering. Each is
//! defined twice, once as a native predicate closure and once as expression
//! source, and the two forms must agree on every context a registrar
//! produces. The declared order below is the evaluation order and never
//! changes.
//!
//! ## Failure modes
//!
//! | Invariant                      | Scope        | Mode   |
//! |--------------------------------|--------------|--------|
//! | `state.identity.explicit`      | State        | Reject |
//! | `state.identity.immutable`     | Transition   | Reject |
//! | `state.identity.unique`        | Registration | Halt   |
//! | `state.lineage.explicit`       | Transition   | Reject |
//! | `state.lineage.parent_exists`  | Registration | Reject |
//! | `state.lineage.single_parent`  | Transition   | Reject |
//! | `state.lineage.continuous`     | Registration | Halt   |
//! | `ordering.total`               | Registration | Halt   |
//! | `ordering.deterministic`       | Registration | Reject |
//! | `ordering.monotonic`           | Registration | Reject |
//! | `ordering.non_semantic`        | Registration | Reject |
//!
//! `ordering.deterministic` and `ordering.non_semantic` are architectural
//! properties: no single evaluation can observe them, so their predicates
//! are tautologies and the properties themselves are proven by the replay
//! and parity suites.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tenet_core::{FailureMode, Invariant, InvariantSet, Scope, StateId};

/// Stable invariant ids; these are contract and reproduce verbatim
pub mod ids {
    /// Non-empty explicit state id
    pub const IDENTITY_EXPLICIT: &str = "state.identity.explicit";
    /// A transition never changes the id it extends
    pub const IDENTITY_IMMUTABLE: &str = "state.identity.immutable";
    /// No duplicate id among root registrations
    pub const IDENTITY_UNIQUE: &str = "state.identity.unique";
    /// Either a parent or an explicit root marker
    pub const LINEAGE_EXPLICIT: &str = "state.lineage.explicit";
    /// The claimed parent is already registered
    pub const LINEAGE_PARENT_EXISTS: &str = "state.lineage.parent_exists";
    /// Exactly one parent or none
    pub const LINEAGE_SINGLE_PARENT: &str = "state.lineage.single_parent";
    /// The registered parent chain has no gaps
    pub const LINEAGE_CONTINUOUS: &str = "state.lineage.continuous";
    /// Every registration receives a well-defined non-negative index
    pub const ORDERING_TOTAL: &str = "ordering.total";
    /// Identical inputs produce identical judgments
    pub const ORDERING_DETERMINISTIC: &str = "ordering.deterministic";
    /// The next index exceeds every previously assigned index
    pub const ORDERING_MONOTONIC: &str = "ordering.monotonic";
    /// Indices derive from registration sequence alone
    pub const ORDERING_NON_SEMANTIC: &str = "ordering.non_semantic";

    /// All builtin ids in evaluation order
    pub const ALL: &[&str] = &[
        IDENTITY_EXPLICIT,
        IDENTITY_IMMUTABLE,
        IDENTITY_UNIQUE,
        LINEAGE_EXPLICIT,
        LINEAGE_PARENT_EXISTS,
        LINEAGE_SINGLE_PARENT,
        LINEAGE_CONTINUOUS,
        ORDERING_TOTAL,
        ORDERING_DETERMINISTIC,
        ORDERING_MONOTONIC,
        ORDERING_NON_SEMANTIC,
    ];
}

/// Build the builtin invariant set, in evaluation order
pub fn builtin_invariants() -> InvariantSet {
    InvariantSet::new(vec![
        identity_explicit(),
        identity_immutable(),
        identity_unique(),
        lineage_explicit(),
        lineage_parent_exists(),
        lineage_single_parent(),
        lineage_continuous(),
        ordering_total(),
        ordering_deterministic(),
        ordering_monotonic(),
        ordering_non_semantic(),
    ])
    .expect("builtin invariant ids are fixed, unique, and non-empty")
}

fn identity_explicit() -> Invariant {
    Invariant::new(
        ids::IDENTITY_EXPLICIT,
        Scope::State,
        FailureMode::Reject,
        "state id must be an explicit non-empty string",
        Arc::new(|ctx| !ctx.state().id().as_str().is_empty()),
        Some("is_string(state.id) && non_empty(state.id)".to_string()),
    )
    .with_applies_to(vec!["id".to_string()])
}

fn identity_immutable() -> Invariant {
    Invariant::new(
        ids::IDENTITY_IMMUTABLE,
        Scope::Transition,
        FailureMode::Reject,
        "a transition must not change the id of the state it extends",
        Arc::new(|ctx| ctx.from().map_or(true, |from| from == ctx.state().id())),
        Some("is_null(transition.from) || transition.from == state.id".to_string()),
    )
    .with_applies_to(vec!["id".to_string(), "from".to_string()])
}

fn identity_unique() -> Invariant {
    Invariant::new(
        ids::IDENTITY_UNIQUE,
        Scope::Registration,
        FailureMode::Halt,
        "a root registration must not reuse an already-registered id",
        Arc::new(|ctx| {
            ctx.from().is_some()
                || ctx
                    .registry()
                    .map_or(true, |registry| !registry.contains_state(ctx.state().id().as_str()))
        }),
        Some("!is_null(transition.from) || !contains_state(state.id)".to_string()),
    )
    .with_applies_to(vec!["id".to_string()])
}

fn lineage_explicit() -> Invariant {
    Invariant::new(
        ids::LINEAGE_EXPLICIT,
        Scope::Transition,
        FailureMode::Reject,
        "a state must either extend a parent or be explicitly marked as a root",
        Arc::new(|ctx| ctx.from().is_some() || ctx.state().is_root_marked()),
        Some("!is_null(transition.from) || state.structure.isRoot == true".to_string()),
    )
    .with_applies_to(vec!["from".to_string()])
}

fn lineage_parent_exists() -> Invariant {
    Invariant::new(
        ids::LINEAGE_PARENT_EXISTS,
        Scope::Registration,
        FailureMode::Reject,
        "the claimed parent must already be registered",
        Arc::new(|ctx| {
            ctx.from().map_or(true, |from| {
                ctx.registry()
                    .map_or(false, |registry| registry.contains_state(from.as_str()))
            })
        }),
        Some("is_null(transition.from) || contains_state(transition.from)".to_string()),
    )
    .with_applies_to(vec!["from".to_string()])
}

fn lineage_single_parent() -> Invariant {
    Invariant::new(
        ids::LINEAGE_SINGLE_PARENT,
        Scope::Transition,
        FailureMode::Reject,
        "a state has exactly one parent or none",
        // The transition type already guarantees this; re-verified so the
        // rule stays declared rather than implicit
        Arc::new(|ctx| ctx.from().is_none() || ctx.from().is_some()),
        Some("is_null(transition.from) || is_string(transition.from)".to_string()),
    )
    .with_applies_to(vec!["from".to_string()])
}

fn lineage_continuous() -> Invariant {
    Invariant::new(
        ids::LINEAGE_CONTINUOUS,
        Scope::Registration,
        FailureMode::Halt,
        "the registered parent chain must be continuous, with no gaps",
        Arc::new(|ctx| {
            let from = match ctx.from() {
                None => return true,
                Some(from) => from,
            };
            let registry = match ctx.registry() {
                None => return false,
                Some(registry) => registry,
            };
            // Walk the whole chain; a link to an unregistered id is a gap.
            // The visited set closes self-referential chains.
            let mut visited: FxHashSet<StateId> = FxHashSet::default();
            let mut current = from.clone();
            loop {
                if !visited.insert(current.clone()) {
                    return true;
                }
                match registry.parent_of(current.as_str()) {
                    None => return false,
                    Some(None) => return true,
                    Some(Some(parent)) => current = parent.clone(),
                }
            }
        }),
        Some("is_null(transition.from) || contains_state(transition.from)".to_string()),
    )
    .with_applies_to(vec!["from".to_string()])
}

fn ordering_total() -> Invariant {
    Invariant::new(
        ids::ORDERING_TOTAL,
        Scope::Registration,
        FailureMode::Halt,
        "every registration must receive a well-defined non-negative order index",
        Arc::new(|ctx| ctx.ordering().map_or(false, |o| o.next_index >= 0)),
        Some("next_order_index() >= 0".to_string()),
    )
    .with_applies_to(vec!["orderIndex".to_string()])
}

fn ordering_deterministic() -> Invariant {
    Invariant::new(
        ids::ORDERING_DETERMINISTIC,
        Scope::Registration,
        FailureMode::Reject,
        "identical inputs always produce identical judgments; proven by replay, not per call",
        Arc::new(|_ctx| true),
        Some("true".to_string()),
    )
    .with_applies_to(vec!["orderIndex".to_string()])
}

fn ordering_monotonic() -> Invariant {
    Invariant::new(
        ids::ORDERING_MONOTONIC,
        Scope::Registration,
        FailureMode::Reject,
        "the next order index must be non-negative and exceed every assigned index",
        Arc::new(|ctx| {
            ctx.ordering()
                .map_or(false, |o| o.next_index >= 0 && o.next_index > o.max_index)
        }),
        Some("next_order_index() >= 0 && next_order_index() > max_order_index()".to_string()),
    )
    .with_applies_to(vec!["orderIndex".to_string()])
}

fn ordering_non_semantic() -> Invariant {
    Invariant::new(
        ids::ORDERING_NON_SEMANTIC,
        Scope::Registration,
        FailureMode::Reject,
        "order indices derive only from the registration sequence, never from payload content",
        Arc::new(|_ctx| true),
        Some("true".to_string()),
    )
    .with_applies_to(vec!["orderIndex".to_string()])
}
