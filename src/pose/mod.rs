pub mod landmark;
pub mod reference;
pub mod region;
pub mod source;

pub use landmark::{Landmark, LandmarkIndex, PoseSample};
pub use reference::{mirrored, reference_pose};
pub use region::PlayerRegion;
pub use source::{
    select_pose_source, AbsentPoseSource, FrameContext, MissingModel, NeuralPoseSource, PoseEstimator,
    PoseFallback, PoseSource, PoseSourceKind, SimulatedPoseSource,
};
