/// Motion capture pipeline
///
/// Frame extraction and pose detection are owned by the caller. This module
/// only defines the seams they plug into and drives them to build a
/// `MotionSequence`; it never loads or caches a model itself.

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{MotionSequence, Pose};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Supplies ordered, roughly evenly spaced frames from a video
pub trait FrameSource {
    type Frame;
    type Error: std::error::Error + Send + Sync + 'static;

    fn extract_frames(
        &self,
        video: &str,
        sample_count: usize,
    ) -> Result<Vec<Self::Frame>, Self::Error>;
}

/// Detects a single person's pose in a frame
pub trait PoseDetector<F> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Ok(None)` means no person was found in the frame
    fn detect_pose(&self, frame: &F) -> Result<Option<Pose>, Self::Error>;
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to extract frames from {video}")]
    FrameExtraction {
        video: String,
        #[source]
        source: BoxError,
    },

    #[error("Pose detection failed on frame {frame_index}")]
    Detection {
        frame_index: usize,
        #[source]
        source: BoxError,
    },
}

/// Extract frames from `video` and detect one pose per frame
///
/// Frames without a detected person are kept as empty slots so the
/// sequence keeps its timing.
pub fn capture_motion<S, D>(
    source: &S,
    detector: &D,
    video: &str,
    sample_count: usize,
    frame_rate: Option<f32>,
) -> Result<MotionSequence, CaptureError>
where
    S: FrameSource,
    D: PoseDetector<S::Frame>,
{
    let frames = source
        .extract_frames(video, sample_count)
        .map_err(|e| CaptureError::FrameExtraction {
            video: video.to_string(),
            source: Box::new(e),
        })?;

    let mut poses = Vec::with_capacity(frames.len());
    for (frame_index, frame) in frames.iter().enumerate() {
        let pose = detector
            .detect_pose(frame)
            .map_err(|e| CaptureError::Detection {
                frame_index,
                source: Box::new(e),
            })?;

        if pose.is_none() {
            debug!(frame_index, "No pose detected");
        }
        poses.push(pose);
    }

    let mut sequence = MotionSequence::new(poses);
    sequence.frame_rate = frame_rate;

    info!(
        video,
        frames = sequence.len(),
        detected = sequence.detected_frames(),
        "Captured motion sequence"
    );

    Ok(sequence)
}

/// Pick the primary person out of a multi-person detection.
///
/// The person with the highest mean keypoint confidence wins; ties go to
/// the earliest candidate.
pub fn most_confident_pose(candidates: impl IntoIterator<Item = Pose>) -> Option<Pose> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.mean_confidence() >= candidate.mean_confidence() => Some(current),
        _ => Some(candidate),
    })
}
