use std::fmt;

use thiserror::Error;

/// Which side of a comparison a motion sequence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceRole {
    Reference,
    User,
}

impl fmt::Display for SequenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Errors raised while comparing poses and motion sequences
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("Pose shape mismatch: {left} keypoints vs {right} keypoints")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Joint order mismatch at index {index}: '{left}' vs '{right}'")]
    JointOrderMismatch {
        index: usize,
        left: String,
        right: String,
    },

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("The {0} motion sequence has no frames")]
    EmptySequence(SequenceRole),

    #[error("No aligned frame pair had confident keypoints ({sample_count} samples)")]
    InsufficientData { sample_count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CompareError {
    /// True when the comparison ran but there was nothing to score.
    ///
    /// Callers must surface this as "no score available", never as 0%.
    pub fn is_no_score(&self) -> bool {
        matches!(
            self,
            Self::EmptySequence(_) | Self::InsufficientData { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
