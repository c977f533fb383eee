use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_u8},
};
use crate::metrics::MetricVector;
use crate::session::{SessionIndexEntry, SessionRecord, SessionSink};

fn row_to_index_entry(row: &Row) -> Result<SessionIndexEntry> {
    let timestamp: String = row.get("timestamp")?;
    let similarity: i64 = row.get("similarity")?;
    Ok(SessionIndexEntry {
        key: row.get("key")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        similarity: to_u8(similarity, "similarity")?,
    })
}

fn row_to_record(row: &Row) -> Result<SessionRecord> {
    let recorded_at: String = row.get("recorded_at")?;
    let similarity: i64 = row.get("final_similarity")?;
    let history_json: String = row.get("history_json")?;

    Ok(SessionRecord {
        id: row.get("id")?,
        timestamp: parse_datetime(&recorded_at, "recorded_at")?,
        final_metrics: MetricVector {
            elbow: row.get("elbow")?,
            knee: row.get("knee")?,
            x_factor: row.get("x_factor")?,
            contact_height: row.get("contact_height")?,
            follow_through: row.get("follow_through")?,
        },
        final_similarity: to_u8(similarity, "final_similarity")?,
        history_snapshot: serde_json::from_str(&history_json)
            .context("failed to decode history snapshot")?,
        analysis_type: row.get("analysis_type")?,
        approximate_duration_seconds: row.get("approx_duration_seconds")?,
    })
}

#[async_trait]
impl SessionSink for Database {
    async fn save(&self, record: &SessionRecord) -> Result<SessionIndexEntry> {
        let record = record.clone();
        let history_json =
            serde_json::to_string(&record.history_snapshot).context("failed to encode history")?;

        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let m = &record.final_metrics;
            tx.execute(
                "INSERT OR IGNORE INTO analysis_sessions (
                    id, recorded_at, analysis_type, final_similarity,
                    elbow, knee, x_factor, contact_height, follow_through,
                    history_json, approx_duration_seconds, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.id,
                    record.timestamp.to_rfc3339(),
                    record.analysis_type,
                    record.final_similarity,
                    m.elbow,
                    m.knee,
                    m.x_factor,
                    m.contact_height,
                    m.follow_through,
                    history_json,
                    record.approximate_duration_seconds,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("failed to insert analysis session")?;

            tx.execute(
                "INSERT OR IGNORE INTO session_index (key, timestamp, similarity)
                 VALUES (?1, ?2, ?3)",
                params![
                    record.id,
                    record.timestamp.to_rfc3339(),
                    record.final_similarity,
                ],
            )
            .context("failed to insert session index entry")?;

            let entry = tx.query_row(
                "SELECT key, timestamp, similarity FROM session_index WHERE key = ?1",
                params![record.id],
                |row| Ok(row_to_index_entry(row)),
            )??;

            tx.commit().context("failed to commit session save")?;
            Ok(entry)
        })
        .await
    }

    async fn list_index(&self) -> Result<Vec<SessionIndexEntry>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, timestamp, similarity FROM session_index
                 ORDER BY timestamp DESC",
            )?;
            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_index_entry(row)?);
            }
            Ok(entries)
        })
        .await
    }

    async fn load(&self, key: &str) -> Result<Option<SessionRecord>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, recorded_at, analysis_type, final_similarity,
                        elbow, knee, x_factor, contact_height, follow_through,
                        history_json, approx_duration_seconds
                 FROM analysis_sessions
                 WHERE id = ?1",
            )?;
            let record = stmt
                .query_row(params![key], |row| Ok(row_to_record(row)))
                .optional()?
                .transpose()?;
            Ok(record)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::TargetProfile;
    use chrono::{Duration, SubsecRound};
    use tempfile::tempdir;

    fn record(offset_secs: i64, similarity: u8) -> SessionRecord {
        let target = TargetProfile::default().as_vector();
        SessionRecord {
            id: SessionRecord::new_id(),
            timestamp: (Utc::now() + Duration::seconds(offset_secs)).trunc_subsecs(6),
            final_metrics: target,
            final_similarity: similarity,
            history_snapshot: vec![target; 3],
            analysis_type: "serve".into(),
            approximate_duration_seconds: 0.3,
        }
    }

    #[tokio::test]
    async fn save_load_and_index() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("sessions.db")).unwrap();

        let older = record(-30, 70);
        let newer = record(0, 95);
        db.save(&older).await.unwrap();
        let entry = db.save(&newer).await.unwrap();
        assert_eq!(entry, newer.index_entry());

        let index = db.list_index().await.unwrap();
        let keys: Vec<_> = index.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec![newer.id.as_str(), older.id.as_str()]);

        let loaded = db.load(&older.id).await.unwrap().unwrap();
        assert_eq!(loaded, older);
        assert!(db.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_save_is_idempotent() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("sessions.db")).unwrap();
        let r = record(0, 88);

        let first = db.save(&r).await.unwrap();
        let second = db.save(&r).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(db.list_index().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.db");
        let r = record(0, 60);
        {
            let db = Database::new(path.clone()).unwrap();
            db.save(&r).await.unwrap();
        }
        let db = Database::new(path).unwrap();
        assert_eq!(db.list_index().await.unwrap(), vec![r.index_entry()]);
    }
}
