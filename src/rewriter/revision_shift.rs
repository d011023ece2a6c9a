use super::EventRewriter;
use crate::error::RewriteError;
use crate::event_model::{ChangeSet, Revision};
use crate::stream::ChangeSetSink;

/// Renumbers change sets by a running signed offset. Dropping revisions
/// widens the offset so gaps left by fully suppressed revisions close up in
/// the destination numbering.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisionShiftRewriter {
    offset: i64,
}

impl RevisionShiftRewriter {
    pub fn new(offset: i64) -> Self {
        Self { offset }
    }

    /// The offset currently applied.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Widens the offset by one dropped source revision.
    pub fn drop_revision(&mut self) {
        self.drop_revisions(1);
    }

    /// Widens the offset by `count` dropped source revisions.
    pub fn drop_revisions(&mut self, count: u64) {
        self.offset = self.offset.saturating_sub_unsigned(count);
    }

    fn shifted(&self, revision: Revision) -> Result<Revision, RewriteError> {
        let target = i128::from(revision.0) + i128::from(self.offset);
        if target < 0 || target >= i128::from(Revision::CURRENT.0) {
            return Err(RewriteError::RevisionShiftOutOfRange {
                revision,
                offset: self.offset,
            });
        }
        Ok(Revision(target as u64))
    }
}

impl EventRewriter for RevisionShiftRewriter {
    fn rewrite(
        &mut self,
        mut change_set: ChangeSet,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError> {
        let target = self.shifted(change_set.revision)?;
        change_set.set_revision(target);
        sink.write(change_set)?;
        Ok(())
    }
}
