/// Frame Comparator
///
/// Scores the similarity of two single-frame poses:
/// - Both poses are normalized by their own frame size, so videos of
///   different resolutions compare on equal terms
/// - Keypoint pairs are gated on detector confidence
/// - The mean Euclidean distance of the surviving pairs is mapped onto
///   [0, 100] through the configured score scale

use crate::config::{ScoringConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SCORE_SCALE};
use crate::error::Result;
use crate::models::{FrameScore, Pose};

/// Highest possible similarity
pub const MAX_SCORE: f64 = 100.0;

/// Frame comparator service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComparator {
    /// Minimum confidence both keypoints of a pair must exceed
    confidence_threshold: f32,
    /// Score points lost per unit of average normalized distance
    score_scale: f64,
}

impl FrameComparator {
    /// Create a comparator with the default threshold and scale
    pub fn new() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            score_scale: DEFAULT_SCORE_SCALE,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            score_scale: config.score_scale,
        }
    }

    /// Set minimum confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the score scale
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn with_score_scale(mut self, score_scale: f64) -> Self {
        if score_scale.is_finite() && score_scale > 0.0 {
            self.score_scale = score_scale;
        }
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Compare two poses
    ///
    /// # Errors
    /// `ShapeMismatch` or `JointOrderMismatch` when the poses do not share a
    /// joint layout, `InvalidDimensions` when either frame has a zero side.
    ///
    /// # Returns
    /// The similarity and the number of keypoint pairs that passed the
    /// confidence gate. A pair of poses with no confident pair scores 0 and
    /// is reported as low-confidence rather than as an error.
    pub fn compare(&self, pose_a: &Pose, pose_b: &Pose) -> Result<FrameScore> {
        pose_a.check_compatible(pose_b)?;
        pose_a.check_dimensions()?;
        pose_b.check_dimensions()?;

        let mut total_distance = 0.0;
        let mut compared_keypoints = 0;

        for (kp_a, kp_b) in pose_a.keypoints.iter().zip(&pose_b.keypoints) {
            if !kp_a.is_confident(self.confidence_threshold)
                || !kp_b.is_confident(self.confidence_threshold)
            {
                continue;
            }

            let (xa, ya) = kp_a.normalized(pose_a.width, pose_a.height);
            let (xb, yb) = kp_b.normalized(pose_b.width, pose_b.height);
            let dx = xa - xb;
            let dy = ya - yb;

            total_distance += (dx * dx + dy * dy).sqrt();
            compared_keypoints += 1;
        }

        if compared_keypoints == 0 {
            return Ok(FrameScore::empty());
        }

        let avg_distance = total_distance / compared_keypoints as f64;

        Ok(FrameScore {
            score: self.distance_to_score(avg_distance),
            compared_keypoints,
        })
    }

    /// Map an average normalized distance onto [0, 100]
    pub fn distance_to_score(&self, avg_distance: f64) -> f64 {
        (MAX_SCORE - avg_distance * self.score_scale).clamp(0.0, MAX_SCORE)
    }
}

impl Default for FrameComparator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two single-frame poses with the given configuration
///
/// Fails with `InvalidConfig` for a configuration `ScoringConfig::validate`
/// rejects.
pub fn compare_frames(pose_a: &Pose, pose_b: &Pose, config: &ScoringConfig) -> Result<FrameScore> {
    config.validate()?;
    FrameComparator::from_config(config).compare(pose_a, pose_b)
}
