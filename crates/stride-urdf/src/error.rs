//! Error types for URDF loading.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UrdfError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XML that `urdf-rs` rejects.
    #[error("URDF parse error: {0}")]
    Parse(String),

    #[error("missing link: {0}")]
    MissingLink(String),

    #[error("missing joint: {0}")]
    MissingJoint(String),

    /// Joint type the kinematic tree cannot represent.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// Every link is the child of some joint.
    #[error("no root link found")]
    NoRootLink,

    /// A floating-base robot hangs from exactly one root link.
    #[error("expected a single root link, found {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
}
