// Execution record store

use crate::types::{ExecutionId, ExecutionRecord};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Thread-safe store of execution records.
///
/// Records are retained for the lifetime of the store.
pub struct ExecutionStore {
    records: RwLock<HashMap<ExecutionId, ExecutionRecord>>,
    sequence: AtomicU64,
}

impl ExecutionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Allocate a fresh execution id.
    ///
    /// Format is `exec_<unix millis>_<sequence>`. The sequence is shared by
    /// all callers, so two ids never collide within one store.
    pub fn next_id(&self) -> ExecutionId {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        ExecutionId(format!("exec_{}_{}", Utc::now().timestamp_millis(), seq))
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ExecutionId, ExecutionRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert(&self, record: ExecutionRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.execution_id.clone(), record);
    }

    pub fn get(&self, id: &ExecutionId) -> Option<ExecutionRecord> {
        self.read().get(id).cloned()
    }

    /// Snapshot of all records, oldest first
    pub fn list(&self) -> Vec<ExecutionRecord> {
        let mut records: Vec<_> = self.read().values().cloned().collect();
        records.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.execution_id.cmp(&b.execution_id))
        });
        records
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }
}

impl Default for ExecutionStore {
    fn default() -> Self {
        Self::new()
    }
}
