pub mod frame_clock;
pub mod source;
pub mod throttle;

pub use frame_clock::{FrameClock, TickSchedule};
pub use source::{Clock, ManualClock, MonotonicClock};
pub use throttle::Throttle;
