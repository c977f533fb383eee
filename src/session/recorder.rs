use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use super::{SessionRecord, SessionSink, SessionState};

/// History entries copied into a saved record.
pub const SNAPSHOT_LEN: usize = 20;
/// Seconds represented by one history entry (the extraction interval).
pub const SECONDS_PER_ENTRY: f64 = 0.1;

pub const DEFAULT_ANALYSIS_TYPE: &str = "serve";

pub struct SessionRecorder {
    analysis_type: String,
    sink: Arc<dyn SessionSink>,
}

impl SessionRecorder {
    pub fn new(analysis_type: impl Into<String>, sink: Arc<dyn SessionSink>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
            sink,
        }
    }

    /// Builds the record for `state` without persisting it.
    pub fn capture(&self, state: &SessionState, at: DateTime<Utc>) -> SessionRecord {
        let history = state.history();
        SessionRecord {
            id: SessionRecord::new_id(),
            timestamp: at,
            final_metrics: state.current(),
            final_similarity: state.similarity(),
            history_snapshot: history.last_n(SNAPSHOT_LEN),
            analysis_type: self.analysis_type.clone(),
            approximate_duration_seconds: history.len() as f64 * SECONDS_PER_ENTRY,
        }
    }

    /// Captures `state` and hands it to the sink. Sink errors propagate.
    pub async fn save(&self, state: &SessionState) -> Result<SessionRecord> {
        self.persist(self.capture(state, Utc::now())).await
    }

    /// Writes an already captured record.
    pub async fn persist(&self, record: SessionRecord) -> Result<SessionRecord> {
        let entry = self
            .sink
            .save(&record)
            .await
            .with_context(|| format!("failed to persist session {}", record.id))?;
        info!(
            "Saved session {} (similarity {}, {} history entries)",
            entry.key,
            entry.similarity,
            record.history_snapshot.len()
        );
        Ok(record)
    }
}
