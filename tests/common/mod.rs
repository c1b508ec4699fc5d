#![allow(dead_code)]

use dance_match::models::*;
use std::f32::consts::PI;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// Standing pose in normalized coordinates, COCO order
const BASE_POSE: [(f32, f32); COCO_KEYPOINT_COUNT] = [
    (0.50, 0.14), // nose
    (0.48, 0.12), // left_eye
    (0.52, 0.12), // right_eye
    (0.46, 0.14), // left_ear
    (0.54, 0.14), // right_ear
    (0.44, 0.28), // left_shoulder
    (0.56, 0.28), // right_shoulder
    (0.39, 0.42), // left_elbow
    (0.61, 0.42), // right_elbow
    (0.36, 0.56), // left_wrist
    (0.64, 0.56), // right_wrist
    (0.45, 0.56), // left_hip
    (0.55, 0.56), // right_hip
    (0.44, 0.76), // left_knee
    (0.56, 0.76), // right_knee
    (0.43, 0.95), // left_ankle
    (0.57, 0.95), // right_ankle
];

/// Generates synthetic dancer poses for tests
pub struct MotionGenerator;

impl MotionGenerator {
    /// Static standing pose in a `width` x `height` frame
    pub fn pose(width: u32, height: u32, confidence: f32) -> Pose {
        Self::dance_pose(0.0, width, height, confidence)
    }

    /// Pose at fraction `t` in [0, 1] of a short dance: arms wave and the
    /// body sways side to side
    pub fn dance_pose(t: f32, width: u32, height: u32, confidence: f32) -> Pose {
        let sway = 0.08 * (2.0 * PI * t).sin();
        let wave = 0.12 * (4.0 * PI * t).sin();

        let mut points = [(0.0, 0.0, 0.0); COCO_KEYPOINT_COUNT];
        for (i, (x, y)) in BASE_POSE.iter().enumerate() {
            let arm = matches!(i, 7..=10);
            let nx = x + sway;
            let ny = if arm { y - wave } else { *y };
            points[i] = (nx * width as f32, ny * height as f32, confidence);
        }

        Pose::from_coco(width, height, points)
    }

    /// The dance sampled at `frames` evenly spaced instants
    pub fn dance(frames: usize, width: u32, height: u32, confidence: f32) -> MotionSequence {
        let last = frames.saturating_sub(1).max(1) as f32;
        MotionSequence::from_poses(
            (0..frames).map(|i| Self::dance_pose(i as f32 / last, width, height, confidence)),
        )
    }

    /// `frames` copies of the same pose
    pub fn still(frames: usize, pose: &Pose) -> MotionSequence {
        MotionSequence::from_poses(std::iter::repeat(pose.clone()).take(frames))
    }
}
