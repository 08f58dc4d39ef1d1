//! Physics Error Types
//!
//! Unified error type for the 2D physics core. Functions that can receive
//! degenerate input (polygon construction, ray construction, rope creation,
//! configuration validation) return `Result<T, PhysicsError>` instead of
//! panicking or silently producing NaNs.

use thiserror::Error;

/// Unified error type for physics operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PhysicsError {
    /// Geometry that cannot produce vertices, normals or constraints.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Human-readable description of the problem
        reason: &'static str,
    },
    /// A zero-length direction or normal was provided where a unit vector is required.
    #[error("zero-length vector in {context}")]
    ZeroLengthVector {
        /// Context describing where the zero-length vector was encountered
        context: &'static str,
    },
    /// Attempt to rotate a shape whose rotation is fixed at zero.
    #[error("axis-aligned box cannot be rotated (requested {degrees} degrees)")]
    RotationNotSupported {
        /// The rotation that was requested
        degrees: f32,
    },
    /// A rope needs more particles than were supplied.
    #[error("rope needs at least {min} particles, got {count}")]
    TooFewParticles {
        /// Number of vertices in the definition
        count: usize,
        /// Minimum supported particle count
        min: usize,
    },
    /// Rope vertex and mass arrays disagree in length.
    #[error("rope definition has {vertices} vertices but {masses} masses")]
    MassCountMismatch {
        /// Number of vertices
        vertices: usize,
        /// Number of masses
        masses: usize,
    },
    /// Invalid configuration parameter.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the invalid configuration
        reason: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PhysicsError>;

// ============================================================================
// Tests
// ============================================================================
