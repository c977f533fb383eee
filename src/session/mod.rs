mod record;
pub mod recorder;
mod sink;
mod state;

pub use record::{SessionIndexEntry, SessionRecord};
pub use recorder::{SessionRecorder, DEFAULT_ANALYSIS_TYPE, SNAPSHOT_LEN};
pub use sink::{MemorySessionSink, SessionSink};
pub use state::SessionState;
