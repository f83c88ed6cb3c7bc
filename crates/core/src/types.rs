//! Foundational identifier and mode types
//!
//! This module defines:
//! - StateId: caller-assigned state identifier
//! - EngineMode: which evaluation engine a registrar runs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned identifier for a state
///
/// A StateId is an opaque string chosen by the caller. The registrar never
/// parses or interprets it; the only structural requirement (non-emptiness)
/// is enforced by the `state.identity.explicit` invariant at registration
/// time, not at construction time, so that malformed proposals are refused
/// as data rather than failing to exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    /// Create a StateId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View this id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check whether this id is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Allows map lookups keyed by StateId to take a plain &str
impl std::borrow::Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which evaluation engine a registrar instance runs
///
/// The two engines must produce identical judgments for every input; the
/// mode only selects which representation of the invariant set does the
/// work. The mode is chosen at construction and fixed for the registrar's
/// lifetime, and it is recorded in every snapshot the registrar produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineMode {
    /// Evaluate invariants through their native predicate closures
    Native,
    /// Evaluate invariants through their compiled expression forms
    Dsl,
}

impl EngineMode {
    /// Canonical string form, as recorded in snapshots
    pub const fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Native => "native",
            EngineMode::Dsl => "dsl",
        }
    }

    /// Parse the canonical string form
    ///
    /// Returns None for anything other than `"native"` or `"dsl"` — callers
    /// decide how to report the failure.
    pub fn from_mode_str(s: &str) -> Option<Self> {
        match s {
            "native" => Some(EngineMode::Native),
            "dsl" => Some(EngineMode::Dsl),
            _ => None,
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
