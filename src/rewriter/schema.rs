use super::EventRewriter;
use crate::error::{ConfigError, RewriteError};
use crate::event_model::{ChangeSet, ReplayKey, ReplayedEventKeys, Revision};
use crate::stream::{BufferSink, ChangeSetSink, HistoryReader, ReadRange};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Collapses scattered schema-definition events into a single burst at the
/// earliest revision they are needed and suppresses the now-redundant later
/// occurrences.
///
/// Destination stores require a type to be fully defined before the first
/// instance referencing it arrives; source histories accrue schema edits
/// incrementally across many revisions. On the first schema-typed event this
/// rewriter replays the whole remaining schema backlog, renumbered to the
/// trigger revision, and thereafter drops every forward-iteration occurrence
/// of an already-replayed event. Compaction fires at most once per run.
pub struct SchemaCompactionRewriter<H: HistoryReader> {
    history: H,
    schema_types: BTreeSet<String>,
    chain: Vec<Box<dyn EventRewriter>>,
    trigger_revision: Option<Revision>,
    compacted: bool,
    replayed: ReplayedEventKeys,
}

impl<H: HistoryReader> SchemaCompactionRewriter<H> {
    /// Creates the rewriter over the source history and the fixed set of
    /// schema type names supplied by the destination store.
    pub fn new(history: H, schema_types: BTreeSet<String>) -> Result<Self, ConfigError> {
        if schema_types.is_empty() {
            return Err(ConfigError::EmptySchemaTypeSet);
        }
        Ok(Self {
            history,
            schema_types,
            chain: Vec::new(),
            trigger_revision: None,
            compacted: false,
            replayed: ReplayedEventKeys::new(),
        })
    }

    /// Installs the destination-required rewriter chain applied to change
    /// sets produced during the replay burst, before they reach the sink.
    pub fn with_chain(mut self, chain: Vec<Box<dyn EventRewriter>>) -> Self {
        self.chain = chain;
        self
    }

    /// True once the one-time replay burst has run.
    pub fn compacted(&self) -> bool {
        self.compacted
    }

    /// The revision every schema event is collapsed into, once detected.
    pub fn trigger_revision(&self) -> Option<Revision> {
        self.trigger_revision
    }

    /// Keys of every schema event already emitted.
    pub fn replayed(&self) -> &ReplayedEventKeys {
        &self.replayed
    }

    /// Replays the whole remaining schema backlog, collapsed into the
    /// trigger revision. The secondary cursor is scope-bound and released
    /// before any change set is emitted.
    fn replay_burst(
        &mut self,
        trigger: Revision,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError> {
        let range = ReadRange::between(trigger, Revision::CURRENT)
            .with_type_names(self.schema_types.clone());
        let mut backlog = Vec::new();
        {
            let mut cursor = self.history.open(&range)?;
            while let Some(change_set) = cursor.next()? {
                backlog.push(change_set);
            }
        }
        info!(
            trigger = %trigger,
            change_sets = backlog.len(),
            "schema compaction replaying backlog"
        );
        for mut change_set in backlog {
            change_set.set_revision(trigger);
            for event in &change_set.events {
                self.replayed.record(ReplayKey::of(event));
            }
            self.emit_through_chain(change_set, sink)?;
        }
        Ok(())
    }

    fn emit_through_chain(
        &mut self,
        change_set: ChangeSet,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError> {
        let mut pending = vec![change_set];
        for rewriter in &mut self.chain {
            let mut buffer = BufferSink::new();
            for change_set in pending {
                rewriter.rewrite(change_set, &mut buffer)?;
            }
            pending = buffer.into_change_sets();
        }
        for change_set in pending {
            sink.write(change_set)?;
        }
        Ok(())
    }
}

impl<H: HistoryReader> EventRewriter for SchemaCompactionRewriter<H> {
    fn rewrite(
        &mut self,
        mut change_set: ChangeSet,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError> {
        let has_schema_event = change_set
            .events
            .iter()
            .any(|event| self.schema_types.contains(event.type_name()));
        if !self.compacted && has_schema_event {
            let trigger = change_set.revision;
            self.trigger_revision = Some(trigger);
            self.replay_burst(trigger, sink)?;
            self.compacted = true;
        }
        if let Some(trigger) = self.trigger_revision {
            // Renumber schema events to the trigger revision before keying
            // so a forward-iteration occurrence collides with its replayed
            // counterpart.
            let schema_types = &self.schema_types;
            let replayed = &self.replayed;
            let before = change_set.len();
            change_set.events.retain_mut(|event| {
                if !schema_types.contains(event.type_name()) {
                    return true;
                }
                event.set_revision(trigger);
                !replayed.contains(&ReplayKey::of(event))
            });
            if change_set.len() < before {
                debug!(
                    revision = %change_set.revision,
                    dropped = before - change_set.len(),
                    "schema events already replayed, dropped"
                );
            }
        }
        sink.write(change_set)?;
        Ok(())
    }
}
