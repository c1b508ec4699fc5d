/// Integration tests for the capture pipeline
///
/// The frame source and detector are in-memory fakes standing in for the
/// video decoder and the pose model.
mod common;

use assert_matches::assert_matches;
use common::MotionGenerator;
use dance_match::services::motion_capture::{
    capture_motion, most_confident_pose, CaptureError, FrameSource, PoseDetector,
};
use dance_match::{compare_sequences, Pose, ScoringConfig};
use std::fmt;

#[derive(Debug)]
struct FakeError(&'static str);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FakeError {}

/// A "frame" is the fraction of the dance it was taken at, or `None` for a
/// frame with nobody in it
struct FakeVideo {
    fail: bool,
}

impl FrameSource for FakeVideo {
    type Frame = Option<f32>;
    type Error = FakeError;

    fn extract_frames(
        &self,
        video: &str,
        sample_count: usize,
    ) -> Result<Vec<Option<f32>>, FakeError> {
        if self.fail || video.is_empty() {
            return Err(FakeError("cannot decode video"));
        }
        let last = sample_count.saturating_sub(1).max(1) as f32;
        Ok((0..sample_count)
            .map(|i| if i == 2 { None } else { Some(i as f32 / last) })
            .collect())
    }
}

struct FakeDetector {
    fail_on_empty: bool,
}

impl PoseDetector<Option<f32>> for FakeDetector {
    type Error = FakeError;

    fn detect_pose(&self, frame: &Option<f32>) -> Result<Option<Pose>, FakeError> {
        match frame {
            Some(t) => Ok(most_confident_pose(vec![
                MotionGenerator::dance_pose(*t, 640, 480, 0.4),
                MotionGenerator::dance_pose(*t, 640, 480, 0.9),
            ])),
            None if self.fail_on_empty => Err(FakeError("detector crashed")),
            None => Ok(None),
        }
    }
}

#[test]
fn test_capture_keeps_undetected_frames() {
    let sequence = capture_motion(
        &FakeVideo { fail: false },
        &FakeDetector { fail_on_empty: false },
        "dance.mp4",
        12,
        Some(24.0),
    )
    .unwrap();

    assert_eq!(sequence.len(), 12);
    assert_eq!(sequence.detected_frames(), 11);
    assert!(sequence.frames[2].is_none());
    assert_eq!(sequence.frame_rate, Some(24.0));

    let first = sequence.frames[0].as_ref().unwrap();
    assert_eq!(first.keypoints[0].confidence, 0.9);
}

#[test]
fn test_captured_sequences_compare() {
    let reference = capture_motion(
        &FakeVideo { fail: false },
        &FakeDetector { fail_on_empty: false },
        "reference.mp4",
        20,
        None,
    )
    .unwrap();
    let user = MotionGenerator::dance(40, 1280, 720, 0.9);

    let result = compare_sequences(&reference, &user, &ScoringConfig::default()).unwrap();

    assert!(result.score >= 90.0, "got {:.2}", result.score);
    assert!(result.low_confidence_frames > 0);
}

#[test]
fn test_frame_extraction_failure() {
    let err = capture_motion(
        &FakeVideo { fail: true },
        &FakeDetector { fail_on_empty: false },
        "broken.mp4",
        10,
        None,
    )
    .unwrap_err();

    assert_matches!(err, CaptureError::FrameExtraction { ref video, .. } if video == "broken.mp4");
}

#[test]
fn test_detection_failure_reports_frame() {
    let err = capture_motion(
        &FakeVideo { fail: false },
        &FakeDetector { fail_on_empty: true },
        "dance.mp4",
        10,
        None,
    )
    .unwrap_err();

    assert_matches!(err, CaptureError::Detection { frame_index: 2, .. });
    assert_eq!(err.to_string(), "Pose detection failed on frame 2");
}
