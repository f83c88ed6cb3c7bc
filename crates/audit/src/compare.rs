//! Normalized comparison of replay reports
//!
//! Two reports are equivalent when their counts match and, index for
//! index, outcomes classify identically: same kind, same order index for
//! accepted transitions, same sorted violated-id set for refused ones.
//! Free-text messages never participate; [`TransitionOutcome`] already
//! excludes them.
//!
//! Equivalence between a live run and its replay is definitional for a
//! correct engine. Every divergence this module can report describes a
//! defect, so comparison collects all of them rather than stopping at
//! the first.

use crate::replay::{ReplayReport, TransitionOutcome};
use serde::Serialize;
use tenet_core::OutcomeKind;
use thiserror::Error;

/// One way two reports disagree
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum ReportDivergence {
    /// A summary counter differs
    #[error("{field} count differs: {left} vs {right}")]
    CountMismatch {
        /// Which counter: "total", "accepted", "rejected", or "halted"
        field: &'static str,
        /// Count in the left report
        left: usize,
        /// Count in the right report
        right: usize,
    },

    /// The reports cover different numbers of outcomes
    #[error("outcome list length differs: {left} vs {right}")]
    LengthMismatch {
        /// Outcomes in the left report
        left: usize,
        /// Outcomes in the right report
        right: usize,
    },

    /// The same transition classified differently
    #[error("outcome {index} classified {left} on the left but {right} on the right")]
    KindMismatch {
        /// Sequence position
        index: usize,
        /// Left classification
        left: OutcomeKind,
        /// Right classification
        right: OutcomeKind,
    },

    /// The same accepted transition received different order indices
    #[error("outcome {index} order index differs: {left:?} vs {right:?}")]
    OrderIndexMismatch {
        /// Sequence position
        index: usize,
        /// Left order index
        left: Option<u64>,
        /// Right order index
        right: Option<u64>,
    },

    /// The same refused transition violated different invariants
    #[error("outcome {index} violated-id sets differ: {left:?} vs {right:?}")]
    ViolationSetMismatch {
        /// Sequence position
        index: usize,
        /// Left violated ids, sorted
        left: Vec<String>,
        /// Right violated ids, sorted
        right: Vec<String>,
    },
}

/// Outcome of comparing two reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportComparison {
    /// Whether the reports classify identically
    pub equivalent: bool,
    /// Every detected disagreement, in detection order
    pub divergences: Vec<ReportDivergence>,
}

/// Compare two reports under normalized-equivalence rules
pub fn compare_reports(left: &ReplayReport, right: &ReplayReport) -> ReportComparison {
    let mut divergences = Vec::new();

    let counters = [
        ("total", left.total, right.total),
        ("accepted", left.accepted, right.accepted),
        ("rejected", left.rejected, right.rejected),
        ("halted", left.halted, right.halted),
    ];
    for (field, l, r) in counters {
        if l != r {
            divergences.push(ReportDivergence::CountMismatch {
                field,
                left: l,
                right: r,
            });
        }
    }

    if left.outcomes.len() != right.outcomes.len() {
        divergences.push(ReportDivergence::LengthMismatch {
            left: left.outcomes.len(),
            right: right.outcomes.len(),
        });
    }

    for (index, (l, r)) in left.outcomes.iter().zip(&right.outcomes).enumerate() {
        compare_outcome(index, l, r, &mut divergences);
    }

    ReportComparison {
        equivalent: divergences.is_empty(),
        divergences,
    }
}

fn compare_outcome(
    index: usize,
    left: &TransitionOutcome,
    right: &TransitionOutcome,
    divergences: &mut Vec<ReportDivergence>,
) {
    if left.kind != right.kind {
        divergences.push(ReportDivergence::KindMismatch {
            index,
            left: left.kind,
            right: right.kind,
        });
        return;
    }
    match left.kind {
        OutcomeKind::Accepted => {
            if left.order_index != right.order_index {
                divergences.push(ReportDivergence::OrderIndexMismatch {
                    index,
                    left: left.order_index,
                    right: right.order_index,
                });
            }
        }
        OutcomeKind::Rejected | OutcomeKind::Halted => {
            if left.violated_ids != right.violated_ids {
                divergences.push(ReportDivergence::ViolationSetMismatch {
                    index,
                    left: left.violated_ids.clone(),
                    right: right.violated_ids.clone(),
                });
            }
        }
    }
}
