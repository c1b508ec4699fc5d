pub mod comparison;
pub mod keypoint;
pub mod pose;

pub use comparison::*;
pub use keypoint::*;
pub use pose::*;
