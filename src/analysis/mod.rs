pub mod controller;
pub mod loop_worker;
pub mod pipeline;
pub mod stats;
pub mod tracking;

pub use controller::{AnalysisController, TickLoopHandle};
pub use pipeline::{AnalysisPipeline, AnalysisSnapshot, TickOutcome};
pub use stats::{StatsSnapshot, TickRecord, TickStats};
pub use tracking::{Guidance, TrackingMonitor};
