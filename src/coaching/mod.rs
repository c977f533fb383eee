pub mod drills;
pub mod insights;
pub mod phases;

pub use drills::{recommend_drills, Difficulty, Drill, Priority};
pub use insights::{classify, insights_for, Insight, InsightStatus, MetricBands};
pub use phases::{phase_feedback, MotionPhase, DEFAULT_PHASE_FEEDBACK};
