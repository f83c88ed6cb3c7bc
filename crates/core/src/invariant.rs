//! Invariant definitions and ordered invariant sets
//!
//! An invariant is a named structural rule with a scope, a failure mode,
//! and a predicate. Predicates are judgments only: they read an
//! [`EvalContext`] and return a verdict, and can neither mutate anything
//! nor observe anything outside the context.
//!
//! ## Failure modes
//!
//! - [`FailureMode::Reject`]: the proposal is refused, the registry is
//!   untouched, further proposals continue normally
//! - [`FailureMode::Halt`]: the violation is severe enough that accepting
//!   the proposal would corrupt lineage or ordering; the proposal is
//!   refused and reported as a halt
//!
//! Violations never panic and never unwind: every verdict is a value.
//!
//! ## Ordering
//!
//! An [`InvariantSet`] preserves registration order. Evaluation walks the
//! set in that order and collects every violation; reporting order is
//! therefore deterministic for identical inputs.

use crate::context::EvalContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Scope and Failure Mode
// ============================================================================

/// What slice of the evaluation context an invariant judges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Judges the candidate state alone
    State,
    /// Judges the transition (candidate state plus claimed parent)
    Transition,
    /// Judges the registration against registry and ordering facts
    Registration,
}

impl Scope {
    /// Get the scope as a lowercase string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::State => "state",
            Scope::Transition => "transition",
            Scope::Registration => "registration",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a violation of an invariant is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Refuse the proposal; the registrar continues normally
    Reject,
    /// Refuse the proposal and report a halt
    Halt,
}

impl FailureMode {
    /// Get the failure mode as a lowercase string
    pub const fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Reject => "reject",
            FailureMode::Halt => "halt",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Violations and Descriptors
// ============================================================================

/// A single invariant violation produced during evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Id of the violated invariant
    pub invariant_id: String,
    /// The invariant's failure mode at the time of evaluation
    pub classification: FailureMode,
    /// Human-readable description of what was violated
    pub message: String,
}

impl Violation {
    /// Create a violation
    pub fn new(
        invariant_id: impl Into<String>,
        classification: FailureMode,
        message: impl Into<String>,
    ) -> Self {
        Violation {
            invariant_id: invariant_id.into(),
            classification,
            message: message.into(),
        }
    }

    /// Whether this violation halts the registrar's verdict
    pub fn is_halt(&self) -> bool {
        self.classification == FailureMode::Halt
    }
}

/// Serializable description of an invariant (everything but the predicate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantDescriptor {
    /// Stable dotted id, e.g. `state.identity.unique`
    pub id: String,
    /// Evaluation scope
    pub scope: Scope,
    /// Entity kinds the invariant applies to
    pub applies_to: Vec<String>,
    /// Violation classification
    pub failure_mode: FailureMode,
    /// Human-readable statement of the rule
    pub description: String,
}

// ============================================================================
// Invariant
// ============================================================================

/// A native predicate over an evaluation context
///
/// Predicates must be pure: same context, same verdict. `true` means the
/// invariant holds.
pub type NativePredicate = Arc<dyn Fn(&EvalContext<'_>) -> bool + Send + Sync>;

/// A named structural rule
///
/// Carries both a native predicate and, optionally, the rule's source text
/// in the invariant expression language. Engines that evaluate compiled
/// expressions require the source; the native engine ignores it.
#[derive(Clone)]
pub struct Invariant {
    id: String,
    scope: Scope,
    applies_to: Vec<String>,
    failure_mode: FailureMode,
    description: String,
    predicate: NativePredicate,
    source: Option<String>,
}

impl Invariant {
    /// Create an invariant
    pub fn new(
        id: impl Into<String>,
        scope: Scope,
        failure_mode: FailureMode,
        description: impl Into<String>,
        predicate: NativePredicate,
        source: Option<String>,
    ) -> Self {
        Invariant {
            id: id.into(),
            scope,
            applies_to: Vec::new(),
            failure_mode,
            description: description.into(),
            predicate,
            source,
        }
    }

    /// Set the entity kinds this invariant applies to (builder style)
    pub fn with_applies_to(mut self, applies_to: Vec<String>) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Stable dotted id
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Evaluation scope
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Entity kinds this invariant applies to
    pub fn applies_to(&self) -> &[String] {
        &self.applies_to
    }

    /// Violation classification
    #[inline]
    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Human-readable statement of the rule
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Source text in the invariant expression language, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Evaluate the native predicate against a context
    ///
    /// Returns `true` when the invariant holds.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    /// Build the serializable descriptor for this invariant
    pub fn descriptor(&self) -> InvariantDescriptor {
        InvariantDescriptor {
            id: self.id.clone(),
            scope: self.scope,
            applies_to: self.applies_to.clone(),
            failure_mode: self.failure_mode,
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invariant")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("applies_to", &self.applies_to)
            .field("failure_mode", &self.failure_mode)
            .field("description", &self.description)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Invariant Set
// ============================================================================

/// Errors from building an invariant set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantSetError {
    /// The set would be empty
    #[error("invariant set must not be empty")]
    Empty,

    /// Two invariants share an id
    #[error("duplicate invariant id: {id}")]
    DuplicateId {
        /// The id that appeared more than once
        id: String,
    },
}

/// An ordered, duplicate-free collection of invariants
///
/// Evaluation order is the order invariants were supplied in, and it never
/// changes after construction.
#[derive(Debug, Clone)]
pub struct InvariantSet {
    invariants: Vec<Invariant>,
}

impl InvariantSet {
    /// Build a set, rejecting empty input and duplicate ids
    pub fn new(invariants: Vec<Invariant>) -> Result<Self, InvariantSetError> {
        if invariants.is_empty() {
            return Err(InvariantSetError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for inv in &invariants {
            if !seen.insert(inv.id().to_string()) {
                return Err(InvariantSetError::DuplicateId {
                    id: inv.id().to_string(),
                });
            }
        }
        Ok(InvariantSet { invariants })
    }

    /// Number of invariants in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether the set is empty (never true for a constructed set)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }

    /// Iterate invariants in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Invariant> {
        self.invariants.iter()
    }

    /// Look up an invariant by id
    pub fn get(&self, id: &str) -> Option<&Invariant> {
        self.invariants.iter().find(|inv| inv.id() == id)
    }

    /// Descriptors for every invariant, in evaluation order
    pub fn descriptors(&self) -> Vec<InvariantDescriptor> {
        self.invariants.iter().map(Invariant::descriptor).collect()
    }

    /// All invariant ids, sorted lexicographically
    pub fn ids_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.invariants.iter().map(|i| i.id().to_string()).collect();
        ids.sort();
        ids
    }
}
