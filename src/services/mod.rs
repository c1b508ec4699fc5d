pub mod frame_comparator;
pub mod motion_capture;
pub mod sequence_aligner;

pub use frame_comparator::{compare_frames, FrameComparator};
pub use motion_capture::{
    capture_motion, most_confident_pose, CaptureError, FrameSource, PoseDetector,
};
pub use sequence_aligner::{compare_sequences, SequenceAligner};
