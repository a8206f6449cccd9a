//! Built-in result sinks.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::SinkError;
use crate::report::SubmissionRecord;
use crate::traits::ResultSink;

/// Keeps records in memory. Handy for tests and one-shot runs.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<HashMap<Uuid, SubmissionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record.
    pub async fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn persist(&self, record: &SubmissionRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.session.id) {
            return Err(SinkError::DuplicateSubmission(record.session.id));
        }
        records.insert(record.session.id, record.clone());
        Ok(())
    }

    async fn is_completed(&self, session_id: Uuid) -> Result<bool, SinkError> {
        Ok(self.records.lock().await.contains_key(&session_id))
    }
}

/// Writes one pretty-printed JSON file per session into a directory.
pub struct JsonDirSink {
    dir: PathBuf,
    // Serializes check-then-write so two writers cannot both claim a session.
    write_lock: Mutex<()>,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("session-{session_id}.json"))
    }
}

#[async_trait]
impl ResultSink for JsonDirSink {
    async fn persist(&self, record: &SubmissionRecord) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path_for(record.session.id);
        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| SinkError::Storage(e.to_string()))?
        {
            return Err(SinkError::DuplicateSubmission(record.session.id));
        }

        let json = record
            .to_json()
            .map_err(|e| SinkError::Storage(format!("failed to serialize record: {e}")))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::Storage(e.to_string()))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| SinkError::Storage(format!("{}: {e}", path.display())))?;

        tracing::debug!("persisted record to {}", path.display());
        Ok(())
    }

    async fn is_completed(&self, session_id: Uuid) -> Result<bool, SinkError> {
        tokio::fs::try_exists(self.path_for(session_id))
            .await
            .map_err(|e| SinkError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Grade, ScoreResult, PASS_FEEDBACK};
    use crate::session::{Candidate, TestSession};
    use chrono::Utc;

    fn record() -> SubmissionRecord {
        let now = Utc::now();
        let session = TestSession::start(
            "a1",
            Candidate {
                name: "Kamau".into(),
                email: None,
                phone: None,
            },
            30,
            now,
        );
        SubmissionRecord {
            id: Uuid::new_v4(),
            created_at: now,
            assessment_id: "a1".into(),
            session,
            assessment_title: "Title".into(),
            scored_answers: vec![],
            result: ScoreResult {
                total_questions: 0,
                correct_answers: 0,
                wrong_answers: 0,
                skipped_questions: 0,
                total_points: 0,
                points_earned: 0,
                score: 0.0,
                passed: true,
                grade: Grade::F,
                feedback: PASS_FEEDBACK.into(),
            },
        }
    }

    #[tokio::test]
    async fn memory_sink_rejects_duplicates() {
        let sink = MemorySink::new();
        let rec = record();
        assert!(!sink.is_completed(rec.session.id).await.unwrap());

        sink.persist(&rec).await.unwrap();
        assert!(sink.is_completed(rec.session.id).await.unwrap());

        let err = sink.persist(&rec).await.unwrap_err();
        assert!(matches!(err, SinkError::DuplicateSubmission(id) if id == rec.session.id));
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn json_dir_sink_writes_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonDirSink::new(dir.path().join("records"));
        let rec = record();

        sink.persist(&rec).await.unwrap();
        assert!(sink.is_completed(rec.session.id).await.unwrap());

        let loaded = SubmissionRecord::load_json(&sink.path_for(rec.session.id)).unwrap();
        assert_eq!(loaded.session.id, rec.session.id);

        assert!(matches!(
            sink.persist(&rec).await,
            Err(SinkError::DuplicateSubmission(_))
        ));
    }
}
