//! Replay: re-judging a recorded transition sequence from scratch
//!
//! Replay exists to audit, not to execute. It builds a brand-new empty
//! registrar, registers every transition in sequence, and records each
//! outcome. A halted outcome does not stop the run; replay keeps
//! classifying the rest of the sequence, because the question replay
//! answers is "what did history look like", not "should we continue".
//! Nothing is persisted.
//!
//! ## Key Principle
//!
//! A correct implementation replays a sequence to exactly the outcomes a
//! live run produced. Divergence is a defect in the engine, never a
//! runtime condition to recover from; [`crate::compare_reports`] is how
//! such defects are caught.

use serde::{Deserialize, Serialize};
use tenet_core::{EngineMode, InvariantSet, OutcomeKind, RegistrationResult, Transition};
use tenet_engine::{builtin_invariants, BuildError, Registrar};
use tracing::{debug, trace};

/// Configuration for a replay run
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    mode: EngineMode,
    invariants: InvariantSet,
}

impl ReplayOptions {
    /// Replay under the builtin invariant set
    pub fn new(mode: EngineMode) -> Self {
        ReplayOptions {
            mode,
            invariants: builtin_invariants(),
        }
    }

    /// Replay under an explicit invariant set
    pub fn with_invariants(mode: EngineMode, invariants: InvariantSet) -> Self {
        ReplayOptions { mode, invariants }
    }

    /// The engine mode the replay registrar will run
    #[inline]
    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// The invariant set the replay registrar will enforce
    pub fn invariants(&self) -> &InvariantSet {
        &self.invariants
    }
}

/// One replayed transition's classification
///
/// Free-text violation messages are deliberately absent: outcomes carry
/// only the fields report comparison is defined over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// Position within the replayed sequence
    pub index: usize,
    /// How the registrar classified the transition
    pub kind: OutcomeKind,
    /// Assigned order index, present only on acceptance
    pub order_index: Option<u64>,
    /// Sorted, deduplicated ids of violated invariants
    pub violated_ids: Vec<String>,
}

impl TransitionOutcome {
    /// Record a registration result at its sequence position
    pub fn from_result(index: usize, result: &RegistrationResult) -> Self {
        TransitionOutcome {
            index,
            kind: result.kind(),
            order_index: result.order_index(),
            violated_ids: result.violated_ids(),
        }
    }
}

/// Full classification of a replayed sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Transitions processed
    pub total: usize,
    /// Count classified accepted
    pub accepted: usize,
    /// Count classified rejected
    pub rejected: usize,
    /// Count classified halted
    pub halted: usize,
    /// Per-transition outcomes, in sequence order
    pub outcomes: Vec<TransitionOutcome>,
}

impl ReplayReport {
    /// Build a report from registration results in sequence order
    ///
    /// Live runs use this to produce a report comparable against a
    /// replay of the same sequence.
    pub fn from_results(results: &[RegistrationResult]) -> Self {
        let outcomes: Vec<TransitionOutcome> = results
            .iter()
            .enumerate()
            .map(|(index, result)| TransitionOutcome::from_result(index, result))
            .collect();
        let count = |kind: OutcomeKind| outcomes.iter().filter(|o| o.kind == kind).count();
        ReplayReport {
            total: outcomes.len(),
            accepted: count(OutcomeKind::Accepted),
            rejected: count(OutcomeKind::Rejected),
            halted: count(OutcomeKind::Halted),
            outcomes,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} transitions: {} accepted, {} rejected, {} halted",
            self.total, self.accepted, self.rejected, self.halted
        )
    }
}

/// Re-judge a transition sequence against a fresh registrar
///
/// Fails only if the options themselves cannot build an engine; the
/// replay itself never fails, every transition classifies to data.
pub fn replay(
    transitions: &[Transition],
    options: &ReplayOptions,
) -> Result<ReplayReport, BuildError> {
    let mut registrar = Registrar::with_invariants(options.mode, options.invariants.clone())?;
    debug!(
        total = transitions.len(),
        mode = %options.mode,
        "Replaying transition sequence"
    );

    let mut results = Vec::with_capacity(transitions.len());
    for (index, transition) in transitions.iter().enumerate() {
        let result = registrar.register(transition);
        trace!(index, kind = result.kind().as_str(), "Replayed transition");
        results.push(result);
    }
    Ok(ReplayReport::from_results(&results))
}
