//! The compiled evaluation engine
//!
//! A [`CompiledRegistry`] holds one compiled expression per invariant, in
//! the invariant set's evaluation order. Compilation happens once, when
//! the registrar is built; registration then evaluates the frozen
//! expressions only. An invariant set that cannot compile never becomes a
//! registrar.

use crate::error::BuildError;
use tenet_core::hash::{djb2_64, hex16};
use tenet_core::{EvalContext, InvariantSet};
use tenet_dsl::{compile, CompiledExpr};
use tracing::debug;

/// Compiled expressions for an invariant set, aligned with its order
#[derive(Debug, Clone)]
pub struct CompiledRegistry {
    entries: Vec<(String, CompiledExpr)>,
}

impl CompiledRegistry {
    /// Compile every invariant's source in set order
    ///
    /// Fails on the first invariant that lacks source or whose source
    /// does not compile; no partially-compiled registry is produced.
    pub fn from_set(set: &InvariantSet) -> Result<Self, BuildError> {
        let mut entries = Vec::with_capacity(set.len());
        for invariant in set.iter() {
            let source = invariant.source().ok_or_else(|| BuildError::MissingSource {
                id: invariant.id().to_string(),
            })?;
            let compiled = compile(source).map_err(|source| BuildError::CompileFailed {
                id: invariant.id().to_string(),
                source,
            })?;
            entries.push((invariant.id().to_string(), compiled));
        }
        let registry = CompiledRegistry { entries };
        debug!(
            invariants = registry.entries.len(),
            registry_id = %registry.registry_id(),
            "Compiled invariant registry"
        );
        Ok(registry)
    }

    /// Number of compiled invariants
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The compiled expression at a set position
    pub fn expr_at(&self, index: usize) -> Option<&CompiledExpr> {
        self.entries.get(index).map(|(_, expr)| expr)
    }

    /// Evaluate the expression at a set position
    ///
    /// A position outside the registry reads as a failed verdict; it is
    /// unreachable for a registry built from the set being evaluated.
    pub fn evaluate_at(&self, index: usize, ctx: &EvalContext<'_>) -> bool {
        self.entries
            .get(index)
            .map_or(false, |(_, expr)| expr.evaluate(ctx))
    }

    /// Content identity of this registry
    ///
    /// A stable hash over the sorted `id=source` lines. Two registries
    /// with the same invariant ids and sources share an identity
    /// regardless of declaration order.
    pub fn registry_id(&self) -> String {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|(id, expr)| format!("{id}={}", expr.source()))
            .collect();
        lines.sort();
        hex16(djb2_64(lines.join("\n").as_bytes()))
    }
}
