/// Sequence Aligner/Scorer
///
/// Reference and user recordings rarely share a length or frame rate. Both
/// sequences are resampled onto `sample_count` aligned slots before any
/// frame is compared: slot `k` of either sequence sits at the fraction
/// `k / (sample_count - 1)` of that sequence's own duration, so the first
/// and last slots always line up with the first and last frames.

use statrs::statistics::Statistics;
use tracing::{debug, warn};

use crate::config::{AlignmentMethod, ScoringConfig};
use crate::error::{CompareError, Result, SequenceRole};
use crate::models::{
    ComparisonResult, FrameBreakdown, FrameScore, Keypoint, MotionSequence, Pose,
};
use crate::services::frame_comparator::FrameComparator;

/// Sequence aligner service
#[derive(Debug, Clone)]
pub struct SequenceAligner {
    config: ScoringConfig,
    comparator: FrameComparator,
}

impl SequenceAligner {
    /// Create an aligner, rejecting unusable configuration
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        let comparator = FrameComparator::from_config(&config);
        Ok(Self { config, comparator })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compare a user motion sequence against a reference
    ///
    /// # Errors
    /// - `EmptySequence` when either input has no frames
    /// - `InsufficientData` when no aligned slot had confident keypoints on
    ///   both sides
    /// - `ShapeMismatch` / `JointOrderMismatch` / `InvalidDimensions` for
    ///   malformed poses
    pub fn compare(
        &self,
        reference: &MotionSequence,
        user: &MotionSequence,
    ) -> Result<ComparisonResult> {
        if user.is_empty() {
            return Err(CompareError::EmptySequence(SequenceRole::User));
        }
        if reference.is_empty() {
            return Err(CompareError::EmptySequence(SequenceRole::Reference));
        }

        let sample_count = self.config.sample_count;
        debug!(
            reference_frames = reference.len(),
            user_frames = user.len(),
            sample_count,
            alignment = %self.config.alignment,
            "Aligning motion sequences"
        );

        let aligned_reference = self.resample(reference)?;
        let aligned_user = self.resample(user)?;

        let mut breakdown = Vec::with_capacity(sample_count);
        let slots = aligned_reference.iter().zip(&aligned_user);
        for (index, (ref_slot, user_slot)) in slots.enumerate() {
            let frame = match (ref_slot, user_slot) {
                (Some(ref_pose), Some(user_pose)) => self.comparator.compare(ref_pose, user_pose)?,
                _ => FrameScore::empty(),
            };

            debug!(
                index,
                score = frame.score,
                compared_keypoints = frame.compared_keypoints,
                "Scored aligned frame"
            );

            breakdown.push(FrameBreakdown {
                index,
                score: frame.score,
                compared_keypoints: frame.compared_keypoints,
            });
        }

        let included: Vec<f64> = breakdown
            .iter()
            .filter(|frame| !frame.is_excluded())
            .map(|frame| frame.score)
            .collect();

        let low_confidence_frames = sample_count - included.len();
        if included.is_empty() {
            warn!(sample_count, "No aligned frame had confident keypoints");
            return Err(CompareError::InsufficientData { sample_count });
        }
        if low_confidence_frames > 0 {
            warn!(
                low_confidence_frames,
                sample_count, "Excluded aligned frames without confident keypoints"
            );
        }

        let score = included.iter().mean().clamp(0.0, 100.0);
        let consistency = included.iter().population_std_dev();

        Ok(ComparisonResult {
            score,
            compared_frames: included.len(),
            sample_count,
            low_confidence_frames,
            consistency,
            per_frame: self.config.per_frame_breakdown.then_some(breakdown),
        })
    }

    /// Map a sequence onto `sample_count` aligned slots
    ///
    /// A one-frame sequence is broadcast to every slot. Slots whose source
    /// frame had no detected pose stay `None`. A slot that lands on a source
    /// frame is that frame unchanged, so it scores exactly as
    /// `compare_frames` would. A slot between two frames is blended into a
    /// 1x1 frame; its coordinates are rounded to `f32` once, after the
    /// blend, and may differ from the frame path in the last bits.
    pub fn resample(&self, sequence: &MotionSequence) -> Result<Vec<Option<Pose>>> {
        let sample_count = self.config.sample_count;
        if sequence.is_empty() {
            return Ok(vec![None; sample_count]);
        }
        let last = sequence.len() - 1;

        (0..sample_count)
            .map(|slot| {
                let position = if last == 0 {
                    0.0
                } else {
                    slot as f64 * last as f64 / (sample_count - 1) as f64
                };
                self.sample_at(sequence, position)
            })
            .collect()
    }

    fn sample_at(&self, sequence: &MotionSequence, position: f64) -> Result<Option<Pose>> {
        let last = sequence.len().saturating_sub(1);
        let lower = (position.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let t = position - lower as f64;

        let nearest = if t < 0.5 { lower } else { upper };

        match self.config.alignment {
            AlignmentMethod::Nearest => Ok(sequence.frames[nearest].clone()),
            AlignmentMethod::Linear => {
                if lower == upper || t == 0.0 {
                    return Ok(sequence.frames[lower].clone());
                }
                match (&sequence.frames[lower], &sequence.frames[upper]) {
                    (Some(a), Some(b)) => interpolate(a, b, t).map(Some),
                    _ => Ok(sequence.frames[nearest].clone()),
                }
            }
        }
    }
}

/// Compare two motion sequences with the given configuration
pub fn compare_sequences(
    reference: &MotionSequence,
    user: &MotionSequence,
    config: &ScoringConfig,
) -> Result<ComparisonResult> {
    SequenceAligner::new(config.clone())?.compare(reference, user)
}

/// Blend two poses of one sequence in normalized space.
///
/// The blended confidence is the lower of the two, so a joint is only as
/// trustworthy as its weakest source frame.
fn interpolate(a: &Pose, b: &Pose, t: f64) -> Result<Pose> {
    a.check_compatible(b)?;
    a.check_dimensions()?;
    b.check_dimensions()?;

    let keypoints = a
        .keypoints
        .iter()
        .zip(&b.keypoints)
        .map(|(ka, kb)| {
            let (xa, ya) = ka.normalized(a.width, a.height);
            let (xb, yb) = kb.normalized(b.width, b.height);
            Keypoint::new(
                ka.name.clone(),
                (xa + (xb - xa) * t) as f32,
                (ya + (yb - ya) * t) as f32,
                ka.confidence.min(kb.confidence),
            )
        })
        .collect();

    Ok(Pose::new(1, 1, keypoints))
}
