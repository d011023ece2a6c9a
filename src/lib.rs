//! # reweave
//!
//! Versioned event-log rewriting engine for migrating or replicating the
//! change history of an object store. The engine consumes an ordered stream
//! of change sets (atomic bundles of object creations, updates, and
//! deletions per revision) and rewrites it before it reaches the
//! destination:
//!
//! - **Cascading object omission** ([`CascadingSkipRewriter`]): drops
//!   policy-selected creations and transitively drops or repairs everything
//!   depending on them through mandatory references, with permanent
//!   cross-change-set memory of what was dropped.
//! - **Schema compaction** ([`SchemaCompactionRewriter`]): collapses
//!   scattered schema-definition events into one burst at the earliest
//!   revision they are needed and suppresses the redundant later
//!   occurrences.
//! - **Revision renumbering** ([`RevisionShiftRewriter`]): closes revision
//!   gaps left by suppressed change sets.
//!
//! The pipeline is single-threaded and pull-based; a rewriter instance is
//! bound to exactly one migration run. The object store itself, transaction
//! handling, and destination commit boundaries are external collaborators
//! reached through the [`stream`] traits.

pub mod error;
pub mod event_model;
pub mod pipeline;
pub mod policy;
pub mod rewriter;
pub mod stream;

pub use error::{ConfigError, RewriteError, StreamError};
pub use event_model::{
    AttributeValue, AttributeValues, Branch, ChangeSet, ItemDeletion, ItemEvent, ItemUpdate,
    ObjectCreation, ObjectIdentity, ObjectKey, ReferenceAttribute, ReplayKey, ReplayedEventKeys,
    Revision, SkippedIdentifiers, StaticTypeMetadata, TypeMetadata,
};
pub use pipeline::{MigrationPipeline, PipelineSummary, DEFAULT_LOG_SIZE_THRESHOLD};
pub use policy::{
    AllOfSkip, KeepAll, MandatoryAwareRepair, ModelDefinitionSkip, ReferenceRepairPolicy,
    RepairPolicyConfig, SkipPolicy, SkipPolicyConfig, TypeNameSkip,
};
pub use rewriter::{
    CascadingSkipRewriter, EventRewriter, RevisionShiftRewriter, SchemaCompactionRewriter,
};
pub use stream::{
    BufferSink, ChangeSetSink, ChangeSetSource, HistoryReader, MemoryHistory, MemorySource,
    ReadRange,
};
