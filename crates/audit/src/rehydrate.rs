//! Fail-closed reconstruction of a registrar from a snapshot
//!
//! ## Order of proof
//!
//! ```text
//! raw text
//!   │ parse_snapshot        strict schema, unknown fields refuse
//!   ▼
//! SnapshotV1
//!   │ validate              version, mode, cross-references, indices
//!   ▼
//! mode match                requested engine == recorded engine
//!   ▼
//! registry hash match       supplied invariants == recorded registry
//!   ▼
//! Registrar::restore        map + counter, counter = max_index + 1
//! ```
//!
//! ## Key Principle
//!
//! No step coerces, defaults, or repairs. A snapshot produced under
//! different invariants or a different engine never becomes a registrar,
//! and a failed rehydration leaves nothing partially constructed behind.

use crate::error::RehydrateError;
use crate::serializer::parse_snapshot;
use crate::snapshot::SnapshotV1;
use std::collections::BTreeMap;
use tenet_core::{EngineMode, InvariantSet};
use tenet_engine::{builtin_invariants, registry_hash_for, RegisteredState, Registrar};
use tracing::{debug, info};

/// Configuration a snapshot is checked against before reconstruction
#[derive(Debug, Clone)]
pub struct RehydrateOptions {
    mode: EngineMode,
    invariants: InvariantSet,
}

impl RehydrateOptions {
    /// Rehydrate against the builtin invariant set
    pub fn new(mode: EngineMode) -> Self {
        RehydrateOptions {
            mode,
            invariants: builtin_invariants(),
        }
    }

    /// Rehydrate against an explicit invariant set
    pub fn with_invariants(mode: EngineMode, invariants: InvariantSet) -> Self {
        RehydrateOptions { mode, invariants }
    }

    /// The engine mode the rebuilt registrar will run
    #[inline]
    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// The invariant set the rebuilt registrar will enforce
    pub fn invariants(&self) -> &InvariantSet {
        &self.invariants
    }
}

/// Rebuild a registrar from canonical snapshot text
pub fn rehydrate(raw: &str, options: &RehydrateOptions) -> Result<Registrar, RehydrateError> {
    let snapshot = parse_snapshot(raw)?;
    rehydrate_snapshot(&snapshot, options)
}

/// Rebuild a registrar from an already-parsed snapshot
///
/// The snapshot is read-only input; rehydration never writes back to it.
pub fn rehydrate_snapshot(
    snapshot: &SnapshotV1,
    options: &RehydrateOptions,
) -> Result<Registrar, RehydrateError> {
    snapshot.validate()?;
    debug!(
        states = snapshot.state_ids.len(),
        mode = %snapshot.mode,
        "Snapshot passed structural validation"
    );

    let recorded = snapshot.engine_mode()?;
    if recorded != options.mode {
        return Err(RehydrateError::ModeMismatch {
            requested: options.mode.as_str().to_string(),
            found: recorded.as_str().to_string(),
        });
    }

    let expected = registry_hash_for(options.mode, &options.invariants)?;
    if snapshot.registry_hash != expected {
        return Err(RehydrateError::RegistryMismatch {
            expected,
            found: snapshot.registry_hash.clone(),
        });
    }

    let mut states = BTreeMap::new();
    for (id, parent) in &snapshot.lineage {
        if let Some(&index) = snapshot.ordering.assigned.get(id) {
            states.insert(id.clone(), RegisteredState::new(parent.clone(), index));
        }
    }
    let next_index = if snapshot.ordering.max_index < 0 {
        0
    } else {
        snapshot.ordering.max_index as u64 + 1
    };
    let registrar = Registrar::restore(
        options.mode,
        options.invariants.clone(),
        states,
        next_index,
    )?;
    info!(
        states = registrar.state_count(),
        next_index,
        mode = %options.mode,
        "Rehydrated registrar from snapshot"
    );
    Ok(registrar)
}
