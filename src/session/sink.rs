use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{SessionIndexEntry, SessionRecord};

/// Durable destination for saved sessions.
///
/// `save` must be idempotent per record id: saving the same record twice
/// stores it once and returns the same index entry.
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn save(&self, record: &SessionRecord) -> Result<SessionIndexEntry>;

    /// Index entries, newest first.
    async fn list_index(&self) -> Result<Vec<SessionIndexEntry>>;

    async fn load(&self, key: &str) -> Result<Option<SessionRecord>>;
}

#[derive(Default)]
struct MemoryStore {
    records: Vec<SessionRecord>,
    index: Vec<SessionIndexEntry>,
}

/// Process-local sink for demos and tests.
#[derive(Default)]
pub struct MemorySessionSink {
    store: Mutex<MemoryStore>,
}

impl MemorySessionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.records.len()
    }
}

#[async_trait]
impl SessionSink for MemorySessionSink {
    async fn save(&self, record: &SessionRecord) -> Result<SessionIndexEntry> {
        let mut store = self.store.lock().await;
        if let Some(existing) = store.index.iter().find(|e| e.key == record.id) {
            return Ok(existing.clone());
        }
        let entry = record.index_entry();
        store.records.push(record.clone());
        store.index.push(entry.clone());
        Ok(entry)
    }

    async fn list_index(&self) -> Result<Vec<SessionIndexEntry>> {
        let store = self.store.lock().await;
        let mut entries = store.index.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    async fn load(&self, key: &str) -> Result<Option<SessionRecord>> {
        let store = self.store.lock().await;
        Ok(store.records.iter().find(|r| r.id == key).cloned())
    }
}
