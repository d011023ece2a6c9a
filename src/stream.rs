//! External interfaces of the rewriting core: pull cursors over a source
//! history, the destination sink, and deterministic in-memory doubles used
//! by tests and small migrations.

use crate::error::StreamError;
use crate::event_model::{Branch, ChangeSet, Revision};
use std::collections::BTreeSet;

/// Pull cursor over an ordered, branch-aware range of history. Release is
/// scoped: dropping the cursor closes it.
pub trait ChangeSetSource {
    /// The next change set in revision order, or `None` at end of stream.
    fn next(&mut self) -> Result<Option<ChangeSet>, StreamError>;
}

/// Destination for rewritten change sets. Callers preserve relative emission
/// order.
pub trait ChangeSetSink {
    fn write(&mut self, change_set: ChangeSet) -> Result<(), StreamError>;
}

/// Parameters of a historical read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRange {
    pub start: Revision,
    pub end: Revision,
    /// Restrict to events whose declared type is in the set. `None` reads
    /// every type.
    pub type_names: Option<BTreeSet<String>>,
    /// Restrict to events on the given branches. `None` reads all branches.
    pub branches: Option<BTreeSet<Branch>>,
}

impl ReadRange {
    /// Full history, every type, every branch.
    pub fn all() -> Self {
        Self {
            start: Revision(0),
            end: Revision::CURRENT,
            type_names: None,
            branches: None,
        }
    }

    /// Revisions `start` through `end` inclusive; `Revision::CURRENT` as end
    /// means the latest revision.
    pub fn between(start: Revision, end: Revision) -> Self {
        Self {
            start,
            end,
            type_names: None,
            branches: None,
        }
    }

    /// Restricts the read to the given type names.
    pub fn with_type_names(mut self, type_names: BTreeSet<String>) -> Self {
        self.type_names = Some(type_names);
        self
    }

    /// Restricts the read to the given branches.
    pub fn with_branches(mut self, branches: BTreeSet<Branch>) -> Self {
        self.branches = Some(branches);
        self
    }

    fn contains_revision(&self, revision: Revision) -> bool {
        revision >= self.start && revision <= self.end
    }
}

/// Collaborator that opens ranged cursors over the source history. Schema
/// compaction uses it for its one-time replay burst.
pub trait HistoryReader {
    fn open(&self, range: &ReadRange) -> Result<Box<dyn ChangeSetSource + '_>, StreamError>;
}

/// In-memory history: a recorded list of change sets in revision order.
/// Serves both as the primary source of small migrations and as the
/// deterministic test double for the `HistoryReader` seam.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    change_sets: Vec<ChangeSet>,
}

impl MemoryHistory {
    pub fn new(change_sets: Vec<ChangeSet>) -> Self {
        Self { change_sets }
    }

    /// Appends a change set; callers keep revision order themselves.
    pub fn push(&mut self, change_set: ChangeSet) {
        self.change_sets.push(change_set);
    }

    /// Cursor over the full recorded history.
    pub fn source(&self) -> MemorySource {
        self.restricted(&ReadRange::all())
    }

    fn restricted(&self, range: &ReadRange) -> MemorySource {
        let mut selected = Vec::new();
        for change_set in &self.change_sets {
            if !range.contains_revision(change_set.revision) {
                continue;
            }
            let mut copy = ChangeSet::new(change_set.revision);
            for event in &change_set.events {
                if let Some(types) = &range.type_names {
                    if !types.contains(event.type_name()) {
                        continue;
                    }
                }
                if let Some(branches) = &range.branches {
                    if !branches.contains(&event.identity().branch) {
                        continue;
                    }
                }
                copy.events.push(event.clone());
            }
            // Restricted reads only yield change sets that still carry events.
            let unrestricted = range.type_names.is_none() && range.branches.is_none();
            if unrestricted || !copy.is_empty() {
                selected.push(copy);
            }
        }
        MemorySource {
            change_sets: selected,
            position: 0,
        }
    }
}

impl HistoryReader for MemoryHistory {
    fn open(&self, range: &ReadRange) -> Result<Box<dyn ChangeSetSource + '_>, StreamError> {
        Ok(Box::new(self.restricted(range)))
    }
}

/// Cursor over a snapshot taken from a `MemoryHistory`.
#[derive(Debug, Clone)]
pub struct MemorySource {
    change_sets: Vec<ChangeSet>,
    position: usize,
}

impl ChangeSetSource for MemorySource {
    fn next(&mut self) -> Result<Option<ChangeSet>, StreamError> {
        let next = self.change_sets.get(self.position).cloned();
        if next.is_some() {
            self.position += 1;
        }
        Ok(next)
    }
}

/// Sink that collects change sets in emission order. Used between pipeline
/// stages and by tests.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    change_sets: Vec<ChangeSet>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected change sets, in emission order.
    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.change_sets
    }

    /// Consumes the sink, yielding the collected change sets.
    pub fn into_change_sets(self) -> Vec<ChangeSet> {
        self.change_sets
    }
}

impl ChangeSetSink for BufferSink {
    fn write(&mut self, change_set: ChangeSet) -> Result<(), StreamError> {
        self.change_sets.push(change_set);
        Ok(())
    }
}
