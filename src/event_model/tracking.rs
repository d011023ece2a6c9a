use super::change::ItemEvent;
use super::identity::{Branch, ObjectIdentity, Revision};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Append-only record of every object identity omitted during a migration
/// run. Policies receive a shared view; only the owning rewriter inserts.
#[derive(Debug, Clone, Default)]
pub struct SkippedIdentifiers {
    identities: HashSet<ObjectIdentity>,
}

impl SkippedIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the identity was omitted earlier in this run.
    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.identities.contains(identity)
    }

    /// Number of omitted identities so far.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Iterates the omitted identities in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectIdentity> {
        self.identities.iter()
    }

    /// Records an omission. Returns false if the identity was already
    /// present. The set never shrinks.
    pub(crate) fn record(&mut self, identity: ObjectIdentity) -> bool {
        self.identities.insert(identity)
    }
}

/// Dedup key of a replayed schema event. The revision component is the
/// revision stamped onto the event at keying time, so a compacted event and
/// its later forward-iteration occurrence collide once both are renumbered
/// to the trigger revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayKey {
    pub branch: Branch,
    pub revision: Revision,
    pub object_name: String,
    pub type_name: String,
}

impl ReplayKey {
    /// Pure key of an event as currently stamped.
    pub fn of(event: &ItemEvent) -> Self {
        let identity = event.identity();
        Self {
            branch: identity.branch,
            revision: event.revision(),
            object_name: identity.object_name.clone(),
            type_name: identity.type_name.clone(),
        }
    }
}

/// Keys of every schema event already emitted by a compaction burst.
#[derive(Debug, Clone, Default)]
pub struct ReplayedEventKeys {
    keys: HashSet<ReplayKey>,
}

impl ReplayedEventKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the key was already replayed.
    pub fn contains(&self, key: &ReplayKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Records a replayed key.
    pub(crate) fn record(&mut self, key: ReplayKey) -> bool {
        self.keys.insert(key)
    }
}
