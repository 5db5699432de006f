//! Audit log of session store commits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

/// A single committed field transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Position in the log, starting at 1
    pub seq: u64,

    /// Namespace the commit applied to
    pub namespace: String,

    /// Action tag that initiated the commit
    pub action: String,

    /// Mutation tag that applied the change
    pub mutation: String,

    /// Field that changed
    pub field: String,

    /// Value before the commit (`Null` when the field was unset)
    pub old: Value,

    /// Value after the commit
    pub new: Value,

    /// When the commit was applied
    pub at: DateTime<Utc>,
}

/// Append-only in-memory log of commits
///
/// Store operations are synchronous, so a plain mutex suffices.
#[derive(Debug, Default)]
pub(crate) struct AuditLog {
    records: Mutex<Vec<CommitRecord>>,
}

impl AuditLog {
    /// Append a record for a commit that just applied
    pub fn append(
        &self,
        namespace: &str,
        action: &str,
        mutation: &str,
        field: &str,
        old: Value,
        new: Value,
    ) -> CommitRecord {
        let mut records = self.records.lock().unwrap();
        let record = CommitRecord {
            seq: records.len() as u64 + 1,
            namespace: namespace.to_string(),
            action: action.to_string(),
            mutation: mutation.to_string(),
            field: field.to_string(),
            old,
            new,
            at: Utc::now(),
        };
        records.push(record.clone());
        record
    }

    /// Get all recorded commits
    pub fn records(&self) -> Vec<CommitRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Get the number of recorded commits
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}
