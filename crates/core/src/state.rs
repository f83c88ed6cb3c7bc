//! State and transition proposals
//!
//! This module defines:
//! - StructureValue: scalar values for structural (non-semantic) fields
//! - State: an identified, structurally-described snapshot of an entity
//! - Transition: a proposed move from a parent id (or none) to a new state
//!
//! ## Structural vs. semantic data
//!
//! A state separates what the registrar may see from what it must not:
//! `structure` holds only structural markers (e.g. the root marker), while
//! `payload` is opaque bytes that no invariant ever reads. Invariants judge
//! shape and lineage, never content.
//!
//! ## Immutability
//!
//! States and transitions are immutable once constructed: builders consume
//! `self`, fields are private, and there are no mutating accessors. A
//! proposal has no effect of any kind until a registrar evaluates it.

use crate::types::StateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structure key marking a state as a lineage root
pub const ROOT_MARKER: &str = "isRoot";

/// Scalar value for a structural field
///
/// Structural fields carry markers and small descriptors, never documents.
/// Different variants are never equal, even when a coercion could relate
/// them: `Int(1) != Bool(true)`, `Str("1") != Int(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureValue {
    /// Explicit absence
    Null,
    /// Boolean marker
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
}

impl StructureValue {
    /// Get the variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            StructureValue::Null => "Null",
            StructureValue::Bool(_) => "Bool",
            StructureValue::Int(_) => "Int",
            StructureValue::Str(_) => "Str",
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StructureValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StructureValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as &str if this is a Str value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StructureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is the Null value
    pub fn is_null(&self) -> bool {
        matches!(self, StructureValue::Null)
    }
}

impl From<bool> for StructureValue {
    fn from(b: bool) -> Self {
        StructureValue::Bool(b)
    }
}

impl From<i64> for StructureValue {
    fn from(i: i64) -> Self {
        StructureValue::Int(i)
    }
}

impl From<&str> for StructureValue {
    fn from(s: &str) -> Self {
        StructureValue::Str(s.to_string())
    }
}

impl From<String> for StructureValue {
    fn from(s: String) -> Self {
        StructureValue::Str(s)
    }
}

/// An identified, structurally-described snapshot of an entity
///
/// ## Invariants
///
/// - `structure` holds only structural fields; invariants may read it
/// - `payload` is opaque and is never read by any invariant
/// - immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    id: StateId,
    structure: BTreeMap<String, StructureValue>,
    payload: Option<Vec<u8>>,
}

impl State {
    /// Create a state with an empty structure and no payload
    pub fn new(id: impl Into<StateId>) -> Self {
        State {
            id: id.into(),
            structure: BTreeMap::new(),
            payload: None,
        }
    }

    /// Create a state carrying the root marker (`isRoot = true`)
    pub fn root(id: impl Into<StateId>) -> Self {
        State::new(id).with_field(ROOT_MARKER, true)
    }

    /// Add a structural field (builder style)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<StructureValue>) -> Self {
        self.structure.insert(key.into(), value.into());
        self
    }

    /// Attach an opaque payload (builder style)
    ///
    /// The payload travels with the state but is invisible to every
    /// invariant and absent from every snapshot.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The caller-assigned id
    #[inline]
    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Look up a structural field
    pub fn structure_value(&self, key: &str) -> Option<&StructureValue> {
        self.structure.get(key)
    }

    /// All structural fields, in key order
    pub fn structure(&self) -> &BTreeMap<String, StructureValue> {
        &self.structure
    }

    /// Whether the structure carries the root marker set to true
    pub fn is_root_marked(&self) -> bool {
        matches!(
            self.structure.get(ROOT_MARKER),
            Some(StructureValue::Bool(true))
        )
    }

    /// The opaque payload, if any
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

/// A proposed move from a parent state id (or none) to a candidate state
///
/// `from = None` denotes a root claim. A transition is a pure proposal: it
/// has no effect until a registrar evaluates it, and evaluation never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    from: Option<StateId>,
    to: State,
}

impl Transition {
    /// Create a transition with an explicit parent option
    pub fn new(from: Option<StateId>, to: State) -> Self {
        Transition { from, to }
    }

    /// Create a root claim (`from = None`)
    pub fn root(to: State) -> Self {
        Transition { from: None, to }
    }

    /// Create an update extending a registered parent
    pub fn update(from: impl Into<StateId>, to: State) -> Self {
        Transition {
            from: Some(from.into()),
            to,
        }
    }

    /// The claimed parent id, if any
    #[inline]
    pub fn from(&self) -> Option<&StateId> {
        self.from.as_ref()
    }

    /// The candidate state
    #[inline]
    pub fn to(&self) -> &State {
        &self.to
    }

    /// Whether this transition claims to start a new lineage
    pub fn is_root_claim(&self) -> bool {
        self.from.is_none()
    }
}
