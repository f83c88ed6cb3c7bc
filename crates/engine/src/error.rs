//! Errors raised while building a registrar
//!
//! Build errors are configuration errors: an invariant set that cannot be
//! turned into a working engine. They are raised at construction time and
//! never during registration — `register` itself always returns a result,
//! never an error.

use tenet_dsl::CompileError;
use thiserror::Error;

/// Errors from assembling an evaluation engine out of an invariant set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The compiled engine needs expression source the invariant lacks
    #[error("invariant '{id}' carries no expression source for the compiled engine")]
    MissingSource {
        /// Id of the sourceless invariant
        id: String,
    },

    /// The invariant's expression source failed to compile
    #[error("invariant '{id}' failed to compile: {source}")]
    CompileFailed {
        /// Id of the failing invariant
        id: String,
        /// The underlying compile error
        #[source]
        source: CompileError,
    },
}
