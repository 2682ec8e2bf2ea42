//! Error types
//!
//! Only precondition violations are errors. An unreachable target is not:
//! the solver reports it as `None` and the session degrades to a best-effort shot.

use thiserror::Error;

/// Simulation error types.
#[derive(Debug, Error)]
pub enum SimError {
    /// A numeric input is non-finite or out of range
    #[error("Invalid {name}: {value} ({reason})")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Expected range
        reason: &'static str,
    },
    /// Settings file could not be parsed
    #[error("Settings error: {0}")]
    Settings(String),
    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Require a finite value strictly greater than zero.
pub(crate) fn require_positive(name: &'static str, value: f64) -> SimResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be a finite number > 0",
        })
    }
}

/// Require a finite value greater than or equal to zero.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> SimResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be a finite number >= 0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(require_positive("speed", 1.0).is_ok());
        assert!(require_positive("speed", 0.0).is_err());
        assert!(require_positive("speed", -3.0).is_err());
        assert!(require_positive("speed", f64::NAN).is_err());
        assert!(require_positive("speed", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("drag", 0.0).is_ok());
        assert!(require_non_negative("drag", -0.1).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = require_positive("gravity", 0.0).unwrap_err();
        assert!(err.to_string().contains("gravity"));
    }
}
