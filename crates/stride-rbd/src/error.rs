use stride_urdf::UrdfError;
use thiserror::Error;

/// Errors raised by the rigid-body model.
#[derive(Debug, Error)]
pub enum RbdError {
    #[error("Robot description error: {0}")]
    Urdf(#[from] UrdfError),

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Joint vector dimension mismatch: expected {expected}, got {got}")]
    JointDimension { expected: usize, got: usize },

    /// Revolute or prismatic joint whose axis has zero length.
    #[error("Joint {0} has a zero-length axis")]
    DegenerateAxis(String),
}
