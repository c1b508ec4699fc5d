/// Poses and motion sequences
///
/// A `Pose` is one frame's worth of keypoints together with the size of the
/// frame they were detected in. A `MotionSequence` is the ordered list of
/// per-frame poses sampled from one video.

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::models::keypoint::{CocoKeypoint, Keypoint, COCO_KEYPOINT_COUNT};

/// All keypoints detected in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Width of the source frame in pixels
    pub width: u32,
    /// Height of the source frame in pixels
    pub height: u32,
    /// Keypoints in detector order
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(width: u32, height: u32, keypoints: Vec<Keypoint>) -> Self {
        Self {
            width,
            height,
            keypoints,
        }
    }

    /// Build a COCO-ordered pose from `(x, y, confidence)` triples
    pub fn from_coco(
        width: u32,
        height: u32,
        points: [(f32, f32, f32); COCO_KEYPOINT_COUNT],
    ) -> Self {
        let keypoints = CocoKeypoint::all()
            .iter()
            .zip(points)
            .map(|(joint, (x, y, confidence))| Keypoint::new(joint.name(), x, y, confidence))
            .collect();

        Self::new(width, height, keypoints)
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Get keypoint by COCO joint
    pub fn keypoint(&self, joint: CocoKeypoint) -> Option<&Keypoint> {
        self.keypoints.get(joint.index())
    }

    /// Mean detector confidence over all keypoints, 0 for an empty pose
    pub fn mean_confidence(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let total: f32 = self.keypoints.iter().map(|kp| kp.confidence).sum();
        total / self.keypoints.len() as f32
    }

    /// Number of keypoints whose confidence is above `threshold`
    pub fn confident_keypoints(&self, threshold: f32) -> usize {
        self.keypoints
            .iter()
            .filter(|kp| kp.is_confident(threshold))
            .count()
    }

    /// Reject frames with a zero dimension, which cannot be normalized
    pub fn check_dimensions(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CompareError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Normalized position of the keypoint at `index`
    pub fn normalized_point(&self, index: usize) -> Option<(f64, f64)> {
        self.keypoints
            .get(index)
            .map(|kp| kp.normalized(self.width, self.height))
    }

    /// Ensure `other` has the same number of joints in the same order
    pub fn check_compatible(&self, other: &Pose) -> Result<()> {
        if self.len() != other.len() {
            return Err(CompareError::ShapeMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        for (index, (a, b)) in self.keypoints.iter().zip(&other.keypoints).enumerate() {
            if a.name != b.name {
                return Err(CompareError::JointOrderMismatch {
                    index,
                    left: a.name.clone(),
                    right: b.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// An ordered series of poses sampled over one video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSequence {
    /// Sampling rate in frames per second, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f32>,
    /// One slot per sampled frame; `None` where the detector found no pose
    pub frames: Vec<Option<Pose>>,
}

impl MotionSequence {
    pub fn new(frames: Vec<Option<Pose>>) -> Self {
        Self {
            frame_rate: None,
            frames,
        }
    }

    /// Sequence where every frame has a detected pose
    pub fn from_poses(poses: impl IntoIterator<Item = Pose>) -> Self {
        Self::new(poses.into_iter().map(Some).collect())
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames with a detected pose
    pub fn detected_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_some()).count()
    }

    /// Duration covered by the sequence, when the frame rate is known
    pub fn duration_secs(&self) -> Option<f32> {
        self.frame_rate
            .filter(|rate| *rate > 0.0)
            .map(|rate| self.frames.len() as f32 / rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn two_point_pose(width: u32, height: u32) -> Pose {
        Pose::new(
            width,
            height,
            vec![
                Keypoint::new("nose", 320.0, 100.0, 0.9),
                Keypoint::new("left_eye", 310.0, 90.0, 0.2),
            ],
        )
    }

    #[test]
    fn test_from_coco_uses_canonical_names() {
        let pose = Pose::from_coco(640, 480, [(1.0, 2.0, 0.5); COCO_KEYPOINT_COUNT]);
        assert_eq!(pose.len(), COCO_KEYPOINT_COUNT);
        assert_eq!(pose.keypoints[0].name, "nose");
        assert_eq!(pose.keypoints[16].name, "right_ankle");
        assert_eq!(
            pose.keypoint(CocoKeypoint::LeftHip).map(|kp| kp.name.as_str()),
            Some("left_hip")
        );
    }

    #[test]
    fn test_normalized_point() {
        let pose = two_point_pose(640, 200);
        assert_eq!(pose.normalized_point(0), Some((0.5, 0.5)));
        assert_eq!(pose.normalized_point(2), None);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_matches!(
            two_point_pose(0, 480).check_dimensions(),
            Err(CompareError::InvalidDimensions { width: 0, height: 480 })
        );
    }

    #[test]
    fn test_confidence_summaries() {
        let pose = two_point_pose(640, 480);
        assert_eq!(pose.confident_keypoints(0.3), 1);
        assert!((pose.mean_confidence() - 0.55).abs() < 1e-6);
        assert_eq!(Pose::new(640, 480, vec![]).mean_confidence(), 0.0);
    }

    #[test]
    fn test_compatibility_checks() {
        let pose = two_point_pose(640, 480);
        assert!(pose.check_compatible(&two_point_pose(1280, 720)).is_ok());

        let shorter = Pose::new(640, 480, vec![Keypoint::new("nose", 0.0, 0.0, 1.0)]);
        assert_matches!(
            pose.check_compatible(&shorter),
            Err(CompareError::ShapeMismatch { left: 2, right: 1 })
        );

        let mut reordered = two_point_pose(640, 480);
        reordered.keypoints.swap(0, 1);
        assert_matches!(
            pose.check_compatible(&reordered),
            Err(CompareError::JointOrderMismatch { index: 0, .. })
        );
    }

    #[test]
    fn test_sequence_from_json_with_missing_frame() {
        let json = r#"{
            "frame_rate": 30.0,
            "frames": [
                {"width": 640, "height": 480, "keypoints": [
                    {"name": "nose", "x": 320.0, "y": 100.0, "score": 0.9}
                ]},
                null
            ]
        }"#;

        let sequence: MotionSequence = serde_json::from_str(json).unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.detected_frames(), 1);
        assert_eq!(sequence.frame_rate, Some(30.0));
        assert!((sequence.duration_secs().unwrap() - 2.0 / 30.0).abs() < 1e-6);
    }
}
