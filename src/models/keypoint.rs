/// Keypoint models and the canonical joint schema
///
/// Keypoints arrive from an external pose detector in source-image pixel
/// space. Comparisons never look at raw pixels: every coordinate is divided
/// by the owning frame's width and height first.

use serde::{Deserialize, Serialize};

/// Number of joints in the COCO keypoint layout
pub const COCO_KEYPOINT_COUNT: usize = 17;

/// A single detected joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Joint name (e.g., "left_shoulder")
    pub name: String,
    /// X coordinate in pixels, or normalized 0-1 for unit-frame poses
    pub x: f32,
    /// Y coordinate in pixels, or normalized 0-1 for unit-frame poses
    pub y: f32,
    /// Detection confidence (0-1)
    #[serde(alias = "score")]
    pub confidence: f32,
}

impl Keypoint {
    /// Create a new keypoint
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }

    /// Whether this keypoint may take part in a comparison.
    ///
    /// The confidence must be strictly above the threshold.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }

    /// Position scaled into the unit square of a `width` x `height` frame
    pub fn normalized(&self, width: u32, height: u32) -> (f64, f64) {
        (
            f64::from(self.x) / f64::from(width),
            f64::from(self.y) / f64::from(height),
        )
    }
}

/// COCO keypoint indices, the joint order every pose is expected to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocoKeypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl CocoKeypoint {
    /// Get keypoint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Position of this joint in a COCO-ordered keypoint list
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// All joints in canonical order
    pub fn all() -> [Self; COCO_KEYPOINT_COUNT] {
        [
            Self::Nose,
            Self::LeftEye,
            Self::RightEye,
            Self::LeftEar,
            Self::RightEar,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }
}
