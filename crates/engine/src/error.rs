//! Engine error kinds.
//!
//! Every error here is recoverable: init logs the offending entry and moves
//! on, so the engine always reaches a working state with partial data.

use thiserror::Error;

/// Errors raised while building or resolving acoustic data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcousticError {
    /// A composite reference named an acoustic that was never defined.
    #[error("unknown acoustic '{0}'")]
    UnknownAcoustic(String),

    /// A composite reference reaches itself through named references.
    #[error("cyclic acoustic reference through '{0}'")]
    CyclicAcoustic(String),

    /// A probability acoustic carries a non-positive weight.
    #[error("acoustic '{0}' has a non-positive probability weight")]
    InvalidWeight(String),

    /// A block pattern is malformed or names no registered block.
    #[error("unknown block pattern '{0}'")]
    UnknownBlockPattern(String),

    /// A variator name has no definition (strict lookups only).
    #[error("unknown variator '{0}'")]
    UnknownVariator(String),
}
