//! Engine error taxonomy.
//!
//! The engine is a pure computation library: it never catches or suppresses
//! these errors. The caller decides how to present them.

use thiserror::Error;

/// Errors raised by indicator computation and frame operations.
///
/// A call either fully succeeds (possibly with NaN warm-up rows, which are
/// normal output) or fails with one of these variants. There is no partial
/// result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Non-positive or otherwise out-of-domain `length` or option.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Unrecognized indicator name; carries the name verbatim.
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Input sequences of differing lengths passed to a multi-series operation.
    #[error("misaligned input: expected {expected} rows, got {actual}")]
    MisalignedInput { expected: usize, actual: usize },

    /// A frame operation referenced a column that does not exist.
    #[error("missing column: {0}")]
    MissingColumn(String),
}

impl EngineError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Fail with `MisalignedInput` unless both lengths agree.
pub fn ensure_aligned(expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::MisalignedInput { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message() {
        let err = EngineError::invalid("length", "must be >= 1");
        assert_eq!(err.to_string(), "invalid parameter `length`: must be >= 1");
    }

    #[test]
    fn ensure_aligned_detects_mismatch() {
        assert!(ensure_aligned(5, 5).is_ok());
        assert_eq!(
            ensure_aligned(5, 4),
            Err(EngineError::MisalignedInput {
                expected: 5,
                actual: 4
            })
        );
    }
}
