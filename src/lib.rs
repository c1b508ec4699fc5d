//! Pose and motion similarity scoring for dance comparison.
//!
//! Poses come from an external detector; this crate only compares them.
//! [`compare_frames`] scores one pair of poses, [`compare_sequences`] aligns
//! two motion sequences of any length and scores the whole motion.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{AlignmentMethod, ScoringConfig};
pub use error::{CompareError, Result, SequenceRole};
pub use models::{
    CocoKeypoint, ComparisonResult, FrameBreakdown, FrameScore, Keypoint, MotionSequence, Pose,
};
pub use services::{compare_frames, compare_sequences, FrameComparator, SequenceAligner};
