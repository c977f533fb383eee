use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::MetricVector;

/// Immutable snapshot of an analysis session, created once per save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub final_metrics: MetricVector,
    pub final_similarity: u8,
    pub history_snapshot: Vec<MetricVector>,
    pub analysis_type: String,
    pub approximate_duration_seconds: f64,
}

impl SessionRecord {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn index_entry(&self) -> SessionIndexEntry {
        SessionIndexEntry {
            key: self.id.clone(),
            timestamp: self.timestamp,
            similarity: self.final_similarity,
        }
    }
}

/// Lightweight listing entry written alongside each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIndexEntry {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub similarity: u8,
}
