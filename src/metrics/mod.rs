pub mod angles;
pub mod extractor;
pub mod history;
mod types;

pub use extractor::{ConstantFollowThrough, FollowThroughEstimator, MetricExtractor};
pub use history::MetricsHistory;
pub use types::{DominantSide, Metric, MetricVector};
