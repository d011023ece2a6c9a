//! Stream rewriters. Each consumes change sets one at a time and emits zero,
//! one, or several change sets to the downstream sink; an instance is bound
//! to a single migration run and never shared across traversals.

pub mod cascade;
pub mod revision_shift;
pub mod schema;

use crate::error::RewriteError;
use crate::event_model::ChangeSet;
use crate::stream::ChangeSetSink;

pub use cascade::CascadingSkipRewriter;
pub use revision_shift::RevisionShiftRewriter;
pub use schema::SchemaCompactionRewriter;

/// A stage of the rewriting pipeline. Processing is strictly sequential: one
/// change set is fully resolved before the next is read, and emitted output
/// is never revisited.
pub trait EventRewriter {
    fn rewrite(
        &mut self,
        change_set: ChangeSet,
        sink: &mut dyn ChangeSetSink,
    ) -> Result<(), RewriteError>;
}
