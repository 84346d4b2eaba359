//! Point-in-time view of every task in the store
//!
//! The snapshot is what task references are resolved against. It is
//! rebuilt by querying the store on every turn that needs resolution and
//! never cached across turns: the store can change between turns (another
//! terminal, an earlier directive in the same session).

use crate::core::error::Result;
use crate::store::output::{self, TaskRow};
use crate::store::TaskStore;
use std::collections::BTreeMap;

/// Attributes of one task at snapshot time
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub title: String,
    pub context: Option<String>,
    pub priority: Option<u32>,
    pub done: bool,
    /// Position in the combined listing, earlier = higher ranked
    pub rank: usize,
}

/// Snapshot of the whole store, keyed by stable task ID
#[derive(Debug, Clone, Default)]
pub struct TaskSnapshot {
    tasks: BTreeMap<String, TaskRecord>,
}

impl TaskSnapshot {
    /// Build a snapshot by querying the store
    ///
    /// Combines the two unfiltered read commands: a search over undone
    /// tasks and one over done tasks.
    pub fn fetch(store: &mut dyn TaskStore, bin: &str) -> Result<Self> {
        let undone = store.run(&format!("{} search \"\" --undone", bin))?;
        let done = store.run(&format!("{} search \"\" --done", bin))?;

        let mut rows = output::parse_rows(&undone);
        rows.extend(output::parse_rows(&done));
        let snapshot = Self::from_rows(rows);
        tracing::debug!(tasks = snapshot.len(), "task snapshot rebuilt");
        Ok(snapshot)
    }

    /// Build a snapshot from already-parsed rows (tests, replays)
    ///
    /// IDs are unique within a snapshot; on a duplicate the first row
    /// wins. Titles carry no uniqueness guarantee.
    pub fn from_rows(rows: Vec<TaskRow>) -> Self {
        let mut tasks = BTreeMap::new();
        for (rank, row) in rows.into_iter().enumerate() {
            tasks.entry(row.id).or_insert(TaskRecord {
                title: row.title,
                context: row.context,
                priority: row.priority,
                done: row.done,
                rank,
            });
        }
        Self { tasks }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskRecord)> {
        self.tasks.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
