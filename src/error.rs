//! The crate's single error type.
//!
//! Maps the taxonomy from the engine's error handling design onto
//! `thiserror` variants. `InternalInvariant` is assertion-only: it should
//! never surface to a user, and exists so debug-mode invariant checks have
//! somewhere to report to instead of panicking in release builds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Property values can only be of primitive types or arrays thereof")]
    InvalidPropertyValue,

    #[error("Cannot merge using null property value")]
    NullInMerge,

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("expression evaluation failed: {0}")]
    RuntimeEval(String),

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
