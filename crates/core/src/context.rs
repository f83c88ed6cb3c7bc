//! Evaluation contexts
//!
//! An [`EvalContext`] is the complete, read-only world an invariant may
//! observe: the candidate state, the claimed parent id, a registry view,
//! and ordering facts. Predicates see nothing else, so identical contexts
//! always produce identical verdicts.
//!
//! Contexts are scoped. A state-scoped context carries only the candidate
//! state; a transition-scoped context adds the claimed parent; a
//! registration-scoped context adds the registry view and ordering facts.
//! Reads outside the scope resolve to absence, never to an error.

use crate::state::State;
use crate::types::StateId;

/// Read-only view of a registry, as exposed to invariant evaluation
///
/// Implementations must be stable for the duration of one evaluation:
/// every query during a single registration sees the same registry.
pub trait RegistryQuery {
    /// Whether a state with this id is registered
    fn contains_state(&self, id: &str) -> bool;

    /// Number of registered states
    fn state_count(&self) -> u64;

    /// Parent of a registered state
    ///
    /// Returns `None` when the id is not registered, `Some(None)` for a
    /// registered root, and `Some(Some(parent))` otherwise.
    fn parent_of(&self, id: &str) -> Option<Option<&StateId>>;
}

/// Ordering facts at the moment of evaluation
///
/// `max_index` is the highest order index assigned so far, or -1 when
/// nothing has been accepted. `next_index` is the index the current
/// proposal would receive on acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingInfo {
    /// Highest assigned order index, -1 when none
    pub max_index: i64,
    /// Index the current proposal would be assigned
    pub next_index: i64,
}

/// Everything an invariant predicate may observe
///
/// Borrowed from the registrar for the duration of one evaluation. Absent
/// parts (e.g. ordering facts in a state-scoped context) read as absence.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    state: &'a State,
    from: Option<&'a StateId>,
    registry: Option<&'a dyn RegistryQuery>,
    ordering: Option<OrderingInfo>,
}

impl<'a> EvalContext<'a> {
    /// Context for a state-scoped evaluation
    pub fn for_state(state: &'a State) -> Self {
        EvalContext {
            state,
            from: None,
            registry: None,
            ordering: None,
        }
    }

    /// Context for a transition-scoped evaluation
    pub fn for_transition(state: &'a State, from: Option<&'a StateId>) -> Self {
        EvalContext {
            state,
            from,
            registry: None,
            ordering: None,
        }
    }

    /// Context for a registration-scoped evaluation
    pub fn for_registration(
        state: &'a State,
        from: Option<&'a StateId>,
        registry: &'a dyn RegistryQuery,
        ordering: OrderingInfo,
    ) -> Self {
        EvalContext {
            state,
            from,
            registry: Some(registry),
            ordering: Some(ordering),
        }
    }

    /// The candidate state
    #[inline]
    pub fn state(&self) -> &State {
        self.state
    }

    /// The claimed parent id, if in scope and present
    #[inline]
    pub fn from(&self) -> Option<&StateId> {
        self.from
    }

    /// The registry view, if in scope
    #[inline]
    pub fn registry(&self) -> Option<&dyn RegistryQuery> {
        self.registry
    }

    /// Ordering facts, if in scope
    #[inline]
    pub fn ordering(&self) -> Option<OrderingInfo> {
        self.ordering
    }
}

impl std::fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("state", &self.state.id())
            .field("from", &self.from)
            .field("has_registry", &self.registry.is_some())
            .field("ordering", &self.ordering)
            .finish()
    }
}
