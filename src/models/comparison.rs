/// Comparison result models
use serde::{Deserialize, Serialize};

/// Similarity of one pair of poses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameScore {
    /// Similarity in [0, 100]
    pub score: f64,
    /// Keypoint pairs that passed the confidence gate
    pub compared_keypoints: usize,
}

impl FrameScore {
    /// Score for a frame pair with no usable evidence
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            compared_keypoints: 0,
        }
    }

    /// True when no keypoint pair passed the confidence gate.
    ///
    /// The score of such a frame is 0 but carries no information.
    pub fn is_low_confidence(&self) -> bool {
        self.compared_keypoints == 0
    }
}

/// Per-slot entry of the aligned comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBreakdown {
    /// Aligned slot index in `0..sample_count`
    pub index: usize,
    pub score: f64,
    pub compared_keypoints: usize,
}

impl FrameBreakdown {
    pub fn is_excluded(&self) -> bool {
        self.compared_keypoints == 0
    }
}

/// Outcome of comparing a user motion sequence against a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Mean of the included per-frame scores, in [0, 100]
    pub score: f64,
    /// Aligned slots that contributed to `score`
    pub compared_frames: usize,
    /// Total aligned slots
    pub sample_count: usize,
    /// Aligned slots excluded for lack of confident keypoints
    pub low_confidence_frames: usize,
    /// Population standard deviation of the included per-frame scores
    pub consistency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_frame: Option<Vec<FrameBreakdown>>,
}

impl ComparisonResult {
    /// Fraction of aligned slots that were actually scored
    pub fn coverage(&self) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }
        self.compared_frames as f64 / self.sample_count as f64
    }
}
