//! The registrar: transition acceptance, ordering, and lineage
//!
//! ## Registration algorithm
//!
//! ```text
//! register(transition)
//!     │
//!     ▼
//! for each invariant, in declared order:
//!     build the context its scope asks for
//!     evaluate through the configured engine
//!     collect a violation on failure        (never short-circuits)
//!     │
//!     ▼
//! any Halt violation ──────► Halted   { all violations }
//! else any violation ──────► Rejected { all violations }
//! else ─────────────────────► Accepted { id, index }
//!     │
//!     ▼ (accepted only)
//! insert RegisteredState keyed by to.id, advance the counter
//! ```
//!
//! Refused proposals leave the registry untouched and consume no order
//! index. Registering an already-present id replaces that entry; history
//! is extended by the new registration, never edited in place.
//!
//! ## Key Principle
//!
//! One registrar, one engine. The evaluation engine is chosen at
//! construction and never switched; parity between the two engines is
//! proven by the conformance suites, not checked per call.

use crate::builtin::builtin_invariants;
use crate::compiled::CompiledRegistry;
use crate::error::BuildError;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tenet_core::hash::{djb2_64, hex16};
use tenet_core::{
    EngineMode, EvalContext, InvariantDescriptor, InvariantSet, OrderingInfo, RegistrationResult,
    RegistryQuery, Scope, State, StateId, Transition, ValidationReport, Violation,
};
use tracing::{debug, trace};

/// A state admitted by the registrar
///
/// Owned exclusively by the registrar; created on acceptance and replaced
/// only by a later acceptance of the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredState {
    parent: Option<StateId>,
    order_index: u64,
}

impl RegisteredState {
    /// Create an entry
    pub fn new(parent: Option<StateId>, order_index: u64) -> Self {
        RegisteredState {
            parent,
            order_index,
        }
    }

    /// The parent id, `None` for a root
    #[inline]
    pub fn parent(&self) -> Option<&StateId> {
        self.parent.as_ref()
    }

    /// The order index assigned at acceptance
    #[inline]
    pub fn order_index(&self) -> u64 {
        self.order_index
    }
}

/// What `validate` may be pointed at
#[derive(Debug, Clone, Copy)]
pub enum ValidationTarget<'a> {
    /// A bare state: only state-scoped invariants apply
    State(&'a State),
    /// A transition: state- and transition-scoped invariants apply
    Transition(&'a Transition),
}

/// The configured evaluation engine
#[derive(Debug, Clone)]
enum Engine {
    Native,
    Compiled(CompiledRegistry),
}

/// Read-only registry view handed to registration-scoped evaluation
struct RegistryView<'a>(&'a BTreeMap<StateId, RegisteredState>);

impl RegistryQuery for RegistryView<'_> {
    fn contains_state(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    fn state_count(&self) -> u64 {
        self.0.len() as u64
    }

    fn parent_of(&self, id: &str) -> Option<Option<&StateId>> {
        self.0.get(id).map(RegisteredState::parent)
    }
}

/// Deterministic structural registrar
///
/// Owns the registered-state map and the order counter. Single-threaded
/// and synchronous: every operation runs to completion, and no instance
/// ever observes another's state.
#[derive(Debug)]
pub struct Registrar {
    mode: EngineMode,
    invariants: InvariantSet,
    engine: Engine,
    states: BTreeMap<StateId, RegisteredState>,
    next_index: u64,
}

impl Registrar {
    /// Create an empty registrar over the builtin invariant set
    pub fn new(mode: EngineMode) -> Result<Self, BuildError> {
        Registrar::with_invariants(mode, builtin_invariants())
    }

    /// Create an empty registrar over an explicit invariant set
    ///
    /// For [`EngineMode::Dsl`] every invariant must carry compilable
    /// expression source; a set that cannot compile never becomes a
    /// registrar.
    pub fn with_invariants(mode: EngineMode, invariants: InvariantSet) -> Result<Self, BuildError> {
        let engine = match mode {
            EngineMode::Native => Engine::Native,
            EngineMode::Dsl => Engine::Compiled(CompiledRegistry::from_set(&invariants)?),
        };
        debug!(mode = %mode, invariants = invariants.len(), "Created registrar");
        Ok(Registrar {
            mode,
            invariants,
            engine,
            states: BTreeMap::new(),
            next_index: 0,
        })
    }

    /// Reconstruct a registrar from validated snapshot parts
    ///
    /// Used by rehydration after it has proven the entries internally
    /// consistent; this constructor trusts them.
    pub fn restore(
        mode: EngineMode,
        invariants: InvariantSet,
        states: BTreeMap<StateId, RegisteredState>,
        next_index: u64,
    ) -> Result<Self, BuildError> {
        let mut registrar = Registrar::with_invariants(mode, invariants)?;
        debug!(
            mode = %mode,
            states = states.len(),
            next_index,
            "Restored registrar from snapshot parts"
        );
        registrar.states = states;
        registrar.next_index = next_index;
        Ok(registrar)
    }

    /// Evaluate and, on acceptance, admit a proposed transition
    ///
    /// Never fails for well-formed input: every outcome is data. All
    /// invariants are evaluated and all violations reported together.
    pub fn register(&mut self, transition: &Transition) -> RegistrationResult {
        let state = transition.to();
        let from = transition.from();
        let ordering = OrderingInfo {
            max_index: self.max_assigned_index(),
            next_index: self.next_index as i64,
        };

        let mut violations = Vec::new();
        let view = RegistryView(&self.states);
        for (position, invariant) in self.invariants.iter().enumerate() {
            let ctx = match invariant.scope() {
                Scope::State => EvalContext::for_state(state),
                Scope::Transition => EvalContext::for_transition(state, from),
                Scope::Registration => {
                    EvalContext::for_registration(state, from, &view, ordering)
                }
            };
            let holds = match &self.engine {
                Engine::Native => invariant.evaluate(&ctx),
                Engine::Compiled(registry) => registry.evaluate_at(position, &ctx),
            };
            if !holds {
                violations.push(Violation::new(
                    invariant.id(),
                    invariant.failure_mode(),
                    invariant.description(),
                ));
            }
        }

        if violations.iter().any(Violation::is_halt) {
            trace!(
                state_id = %state.id(),
                violations = violations.len(),
                "Registration halted"
            );
            return RegistrationResult::Halted { violations };
        }
        if !violations.is_empty() {
            trace!(
                state_id = %state.id(),
                violations = violations.len(),
                "Registration rejected"
            );
            return RegistrationResult::Rejected { violations };
        }

        let order_index = self.next_index;
        self.states.insert(
            state.id().clone(),
            RegisteredState::new(from.cloned(), order_index),
        );
        self.next_index += 1;
        trace!(state_id = %state.id(), order_index, "Registration accepted");
        RegistrationResult::Accepted {
            state_id: state.id().clone(),
            order_index,
            applied_invariants: self
                .invariants
                .iter()
                .map(|invariant| invariant.id().to_string())
                .collect(),
        }
    }

    /// Evaluate a target without registering it
    ///
    /// Registration-scoped invariants are skipped: there is no
    /// registration, so there are no registry or ordering facts to judge.
    pub fn validate(&self, target: ValidationTarget<'_>) -> ValidationReport {
        let (state, from, transition_in_scope) = match target {
            ValidationTarget::State(state) => (state, None, false),
            ValidationTarget::Transition(transition) => {
                (transition.to(), transition.from(), true)
            }
        };

        let mut violations = Vec::new();
        for (position, invariant) in self.invariants.iter().enumerate() {
            let ctx = match invariant.scope() {
                Scope::State => EvalContext::for_state(state),
                Scope::Transition if transition_in_scope => {
                    EvalContext::for_transition(state, from)
                }
                _ => continue,
            };
            let holds = match &self.engine {
                Engine::Native => invariant.evaluate(&ctx),
                Engine::Compiled(registry) => registry.evaluate_at(position, &ctx),
            };
            if !holds {
                violations.push(Violation::new(
                    invariant.id(),
                    invariant.failure_mode(),
                    invariant.description(),
                ));
            }
        }
        ValidationReport::from_violations(violations)
    }

    /// Descriptors of the active invariants, optionally filtered by scope
    ///
    /// Descriptors only: predicates and compiled expressions are never
    /// exposed.
    pub fn list_invariants(&self, scope: Option<Scope>) -> Vec<InvariantDescriptor> {
        self.invariants
            .iter()
            .filter(|invariant| scope.map_or(true, |s| invariant.scope() == s))
            .map(|invariant| invariant.descriptor())
            .collect()
    }

    /// Walk parent pointers from `id` toward a root, newest to oldest
    ///
    /// Returns the partial trace on a dangling link or a revisited id;
    /// returns an empty trace for an unknown id. Never loops.
    pub fn get_lineage(&self, id: &str) -> Vec<StateId> {
        let mut lineage = Vec::new();
        let mut current = match self.states.get_key_value(id) {
            Some((key, _)) => key.clone(),
            None => return lineage,
        };
        let mut visited: FxHashSet<StateId> = FxHashSet::default();
        loop {
            if !visited.insert(current.clone()) {
                break;
            }
            let entry = match self.states.get(current.as_str()) {
                Some(entry) => entry,
                None => break,
            };
            lineage.push(current.clone());
            match entry.parent() {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }
        lineage
    }

    /// The engine mode chosen at construction
    #[inline]
    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// The active invariant set
    pub fn invariants(&self) -> &InvariantSet {
        &self.invariants
    }

    /// Number of registered states
    #[inline]
    pub fn state_count(&self) -> u64 {
        self.states.len() as u64
    }

    /// The index the next accepted registration will receive
    #[inline]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Highest assigned order index, -1 when nothing has been accepted
    pub fn max_assigned_index(&self) -> i64 {
        if self.next_index == 0 {
            -1
        } else {
            (self.next_index - 1) as i64
        }
    }

    /// Whether a state with this id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Registered states in id order
    pub fn states(&self) -> impl Iterator<Item = (&StateId, &RegisteredState)> {
        self.states.iter()
    }

    /// Identity of the active invariant registry, mode-prefixed
    pub fn registry_hash(&self) -> String {
        match &self.engine {
            Engine::Native => native_registry_hash(&self.invariants),
            Engine::Compiled(registry) => format!("registry:{}", registry.registry_id()),
        }
    }
}

/// Registry identity for a set evaluated natively
fn native_registry_hash(invariants: &InvariantSet) -> String {
    let joined = invariants.ids_sorted().join("\n");
    format!("legacy:{}", hex16(djb2_64(joined.as_bytes())))
}

/// Registry identity a snapshot produced under `mode` and `invariants`
/// is expected to carry
///
/// Rehydration compares this against the stored hash before it
/// reconstructs anything.
pub fn registry_hash_for(
    mode: EngineMode,
    invariants: &InvariantSet,
) -> Result<String, BuildError> {
    match mode {
        EngineMode::Native => Ok(native_registry_hash(invariants)),
        EngineMode::Dsl => {
            let registry = CompiledRegistry::from_set(invariants)?;
            Ok(format!("registry:{}", registry.registry_id()))
        }
    }
}
