//! Transform error types
//!
//! Geometric degeneracies that the kernel detects are reported through
//! [`TransformError`] instead of producing NaN/infinite components.

use std::fmt;

/// Error type for transform operations
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformError {
    /// The matrix determinant is exactly zero, so no inverse exists
    Singular,
    /// A rotation axis shorter than [`crate::mat4::MIN_AXIS_LENGTH`]
    DegenerateAxis {
        /// Length of the rejected axis
        length: f32,
    },
    /// Axis extraction from a quaternion with `w = ±1` (no rotation)
    DegenerateAngleExtraction {
        /// Scalar part of the quaternion
        w: f32,
    },
    /// A NaN or infinite component was found
    UnrecoverableNumeric,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Singular => write!(f, "Matrix is singular (determinant is zero)"),
            TransformError::DegenerateAxis { length } => {
                write!(f, "Degenerate rotation axis (length {})", length)
            }
            TransformError::DegenerateAngleExtraction { w } => {
                write!(f, "Cannot extract rotation axis from quaternion with w = {}", w)
            }
            TransformError::UnrecoverableNumeric => {
                write!(f, "Non-finite component (NaN or infinity)")
            }
        }
    }
}

impl std::error::Error for TransformError {}
