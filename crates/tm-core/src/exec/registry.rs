//! In-memory record of scheduled tasks

use crate::exec::cancel::CancellationToken;
use crate::schema::{TaskKind, TaskSnapshot, TaskStatus};
use std::collections::HashMap;
use uuid::Uuid;

/// One scheduled unit of work, owned exclusively by the executor.
///
/// Callers never see a record; they get [`TaskSnapshot`]s.
#[derive(Debug)]
pub struct TaskRecord {
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub output: Option<String>,
    pub created_at: String,
    pub cancel: CancellationToken,
}

/// Registry of every task ever scheduled on one executor.
///
/// Records are retained after their terminal transition so late polls keep
/// working; ids are never reused within the registry's lifetime.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, TaskRecord>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh task id: the kind's one-letter prefix followed by
    /// eight hex characters of uuid entropy. Regenerates on the
    /// (improbable) collision with a live record.
    pub fn allocate_id(&self, kind: TaskKind) -> String {
        loop {
            let entropy = Uuid::new_v4().simple().to_string();
            let id = format!("{}{}", kind.prefix(), &entropy[..8]);
            if !self.tasks.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, id: String, record: TaskRecord) {
        self.tasks.insert(id, record);
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TaskRecord> {
        self.tasks.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<TaskRecord> {
        self.tasks.remove(id)
    }

    pub fn snapshot(&self, id: &str) -> Option<TaskSnapshot> {
        self.tasks.get(id).map(|record| TaskSnapshot {
            id: id.to_string(),
            kind: record.kind,
            status: record.status,
            output: record.output.clone(),
            created_at: record.created_at.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
