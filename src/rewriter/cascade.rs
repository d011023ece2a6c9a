use super::EventRewriter;
use crate::error::{ConfigError, RewriteError};
use crate::event_model::{
    AttributeValue, ChangeSet, ItemEvent, ItemUpdate, SkippedIdentifiers, TypeMetadata,
};
use crate::policy::{
    ReferenceRepairPolicy, RepairPolicyConfig, SkipPolicy, SkipPolicyConfig,
};
use crate::stream::ChangeSetSink;
use tracing::debug;

/// Drops selected object creations and transitively drops or repairs
/// everything that depends on them through mandatory references.
///
/// The omission record persists across every change set processed by this
/// instance: an identity skipped at revision N suppresses matching updates
/// and deletions at every later revision, and cascades onto later creations
/// that reference it.
pub struct CascadingSkipRewriter {
    metadata: Box<dyn TypeMetadata>,
    skip_policy: Box<dyn SkipPolicy>,
    repair_policy: Box<dyn ReferenceRepairPolicy>,
    skipped: SkippedIdentifiers,
    settle_passes: usize,
}

impl CascadingSkipRewriter {
    pub fn new(
        metadata: Box<dyn TypeMetadata>,
        skip_policy: Box<dyn SkipPolicy>,
        repair_policy: Box<dyn ReferenceRepairPolicy>,
    ) -> Self {
        Self {
            metadata,
            skip_policy,
            repair_policy,
            skipped: SkippedIdentifiers::new(),
            settle_passes: 0,
        }
    }

    /// Builds the rewriter from declarative configuration; invalid policy
    /// compositions fail here, before any stream processing.
    pub fn from_config(
        metadata: Box<dyn TypeMetadata>,
        skip_config: &SkipPolicyConfig,
        repair_config: &RepairPolicyConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            metadata,
            skip_config.build()?,
            repair_config.build()?,
        ))
    }

    /// Shared view of every identity omitted so far in this run.
    pub fn skipped(&self) -> &SkippedIdentifiers {
        &self.skipped
    }

    /// Scan passes the fixpoint loop took over the most recent change set.
    /// Every pass but the last removes at least one creation, so the count
    /// never exceeds the creation count plus one.
    pub fn settle_passes(&self) -> usize {
        self.settle_passes
    }

    /// Settles the creation events of a change set to a local fixed point:
    /// each pass removes policy-skipped creations and creations forced out
    /// by a dangling mandatory reference, and every removal restarts the
    /// dangling scan so same-change-set cascades resolve before dispatch.
    fn settle_creations(&mut self, change_set: &mut ChangeSet) {
        self.settle_passes = 0;
        loop {
            self.settle_passes += 1;
            if self.drop_next_dangling_creation(change_set) {
                continue;
            }
            if self.drop_policy_matches(change_set) {
                continue;
            }
            break;
        }
    }

    /// Removes the first creation whose repair decision is a forced skip.
    /// Non-forced repairs null the dangling attribute in place and the scan
    /// moves on. Returns true when a creation was removed.
    fn drop_next_dangling_creation(&mut self, change_set: &mut ChangeSet) -> bool {
        for index in 0..change_set.events.len() {
            let ItemEvent::Creation(creation) = &mut change_set.events[index] else {
                continue;
            };
            let attributes = self
                .metadata
                .reference_attributes(&creation.identity.type_name);
            for attribute in attributes {
                let Some(target) = creation.reference(&attribute.name) else {
                    continue;
                };
                if !self.skipped.contains(&target.identity) {
                    continue;
                }
                let forced =
                    self.repair_policy
                        .on_creation_dangling(creation, attribute, &self.skipped);
                if forced {
                    let identity = creation.identity.clone();
                    change_set.events.remove(index);
                    debug!(identity = %identity, attribute = %attribute.name, "creation dropped, mandatory reference to skipped object");
                    self.skipped.record(identity);
                    return true;
                }
            }
        }
        false
    }

    /// Applies the top-level skip policy to the remaining creations.
    fn drop_policy_matches(&mut self, change_set: &mut ChangeSet) -> bool {
        let mut removed = false;
        let mut index = 0;
        while index < change_set.events.len() {
            let ItemEvent::Creation(creation) = &change_set.events[index] else {
                index += 1;
                continue;
            };
            if self.skip_policy.should_skip(creation, &self.skipped) {
                let identity = creation.identity.clone();
                change_set.events.remove(index);
                debug!(identity = %identity, "creation skipped by policy");
                self.skipped.record(identity);
                removed = true;
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Suppresses updates and deletions addressed to skipped identities and
    /// repairs dangling references of retained updates.
    fn dispatch(&self, change_set: &mut ChangeSet) {
        let mut index = 0;
        while index < change_set.events.len() {
            let keep = match &mut change_set.events[index] {
                ItemEvent::Creation(_) => true,
                ItemEvent::Deletion(deletion) => {
                    let suppress = self.skipped.contains(&deletion.identity);
                    if suppress {
                        debug!(identity = %deletion.identity, "deletion of skipped object suppressed");
                    }
                    !suppress
                }
                ItemEvent::Update(update) => {
                    if self.skipped.contains(&update.identity) {
                        debug!(identity = %update.identity, "update of skipped object suppressed");
                        false
                    } else {
                        !self.repair_update(update)
                    }
                }
            };
            if keep {
                index += 1;
            } else {
                change_set.events.remove(index);
            }
        }
    }

    /// Invokes the repair policy for every dangling reference of an update.
    /// Returns true when any invocation demands suppression of the update.
    fn repair_update(&self, update: &mut ItemUpdate) -> bool {
        let attributes = self
            .metadata
            .reference_attributes(&update.identity.type_name);
        let mut suppress = false;
        for attribute in attributes {
            let Some(target) = update.reference(&attribute.name) else {
                continue;
            };
            if !self.skipped.contains(&target.identity) {
                continue;
            }
            if self
                .repair_policy
                .on_update_dangling(update, attribute, &self.skipped)
            {
                suppress = true;
            }
        }
        if suppress {
            debug!(identity = %update.identity, "update suppressed, dangling mandatory reference");
        }
        suppress
    }

    /// A retained creation or update must not reference a skipped identity.
    /// Hitting this is a repair-policy defect and aborts the run.
    fn assert_consistent(&self, change_set: &ChangeSet) -> Result<(), RewriteError> {
        for event in &change_set.events {
            let (kind, identity, values) = match event {
                ItemEvent::Creation(creation) => {
                    ("creation", &creation.identity, &creation.values)
                }
                ItemEvent::Update(update) => ("update", &update.identity, &update.values),
                ItemEvent::Deletion(_) => continue,
            };
            for (name, value) in values {
                let AttributeValue::Reference(key) = value else {
                    continue;
                };
                if self.skipped.contains(&key.identity) {
                    return Err(RewriteError::DanglingReference {
                        kind,
                        owner: identity.clone(),
                        attribute: name.clone(),
                        target: key.identity.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl EventRewriter for CascadingSkipRewriter {
    fn rewrite(
        &mut self,
        mut change_set: ChangeSet,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError> {
        let incoming = change_set.len();
        self.settle_creations(&mut change_set);
        self.dispatch(&mut change_set);
        self.assert_consistent(&change_set)?;
        debug!(
            revision = %change_set.revision,
            incoming,
            passes = self.settle_passes,
            retained = change_set.len(),
            skipped_total = self.skipped.len(),
            "change set rewritten"
        );
        sink.write(change_set)?;
        Ok(())
    }
}
