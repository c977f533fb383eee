pub mod frame;
pub mod sequence;
pub mod synthetic;

pub use frame::{FrameSource, PlaybackState, VideoFrame};
pub use sequence::ImageSequenceSource;
pub use synthetic::SyntheticCourtSource;
