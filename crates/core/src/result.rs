//! Registration outcomes and validation reports
//!
//! Every proposal resolves to exactly one [`RegistrationResult`]. Outcomes
//! are values, never panics: a refused proposal is an ordinary result that
//! carries the complete list of violations found, not just the first.

use crate::invariant::Violation;
use crate::types::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three possible outcome kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    /// Proposal admitted and assigned an order index
    Accepted,
    /// Proposal refused by reject-mode violations only
    Rejected,
    /// Proposal refused with at least one halt-mode violation
    Halted,
}

impl OutcomeKind {
    /// Get the outcome kind as a lowercase string
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Accepted => "accepted",
            OutcomeKind::Rejected => "rejected",
            OutcomeKind::Halted => "halted",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of registering one transition
///
/// Classification is strict: any halt-mode violation makes the outcome
/// [`Halted`](RegistrationResult::Halted), otherwise any violation makes it
/// [`Rejected`](RegistrationResult::Rejected), otherwise the proposal is
/// [`Accepted`](RegistrationResult::Accepted). Refused proposals leave the
/// registry and the order counter untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RegistrationResult {
    /// Proposal admitted
    Accepted {
        /// Id of the admitted state
        state_id: StateId,
        /// Order index assigned to this registration
        order_index: u64,
        /// Ids of every invariant that was evaluated, in evaluation order
        applied_invariants: Vec<String>,
    },
    /// Proposal refused; all violations were reject-mode
    Rejected {
        /// Every violation found, in evaluation order
        violations: Vec<Violation>,
    },
    /// Proposal refused; at least one violation was halt-mode
    Halted {
        /// Every violation found (halt and reject alike), in evaluation order
        violations: Vec<Violation>,
    },
}

impl RegistrationResult {
    /// Whether the proposal was admitted
    pub fn is_accepted(&self) -> bool {
        matches!(self, RegistrationResult::Accepted { .. })
    }

    /// Whether the proposal was refused without any halt
    pub fn is_rejected(&self) -> bool {
        matches!(self, RegistrationResult::Rejected { .. })
    }

    /// Whether the proposal was refused with a halt
    pub fn is_halted(&self) -> bool {
        matches!(self, RegistrationResult::Halted { .. })
    }

    /// The outcome kind
    pub fn kind(&self) -> OutcomeKind {
        match self {
            RegistrationResult::Accepted { .. } => OutcomeKind::Accepted,
            RegistrationResult::Rejected { .. } => OutcomeKind::Rejected,
            RegistrationResult::Halted { .. } => OutcomeKind::Halted,
        }
    }

    /// The assigned order index, when accepted
    pub fn order_index(&self) -> Option<u64> {
        match self {
            RegistrationResult::Accepted { order_index, .. } => Some(*order_index),
            _ => None,
        }
    }

    /// The admitted state's id, when accepted
    pub fn state_id(&self) -> Option<&StateId> {
        match self {
            RegistrationResult::Accepted { state_id, .. } => Some(state_id),
            _ => None,
        }
    }

    /// Violations carried by this outcome (empty when accepted)
    pub fn violations(&self) -> &[Violation] {
        match self {
            RegistrationResult::Accepted { .. } => &[],
            RegistrationResult::Rejected { violations } => violations,
            RegistrationResult::Halted { violations } => violations,
        }
    }

    /// Ids of violated invariants, sorted and deduplicated
    pub fn violated_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .violations()
            .iter()
            .map(|v| v.invariant_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Result of validating a target without registering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no invariant was violated
    pub valid: bool,
    /// Every violation found, in evaluation order
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Build a report from the violations found
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        ValidationReport {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Ids of violated invariants, sorted and deduplicated
    pub fn violated_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .violations
            .iter()
            .map(|v| v.invariant_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
