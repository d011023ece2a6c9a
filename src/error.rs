use crate::event_model::{ObjectIdentity, Revision};
use thiserror::Error;

/// Construction-time failures of the declarative policy configuration.
/// Raised before any stream processing begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("type-name skip policy requires at least one type name")]
    EmptyTypeSet,
    #[error("model-definition skip policy requires at least one definition name")]
    EmptyDefinitionSet,
    #[error("model-definition skip policy requires at least one definition type")]
    EmptyDefinitionTypeSet,
    #[error("composite skip policy requires at least one sub-policy")]
    EmptyComposition,
    #[error("schema compaction requires at least one schema type name")]
    EmptySchemaTypeSet,
    #[error("malformed policy configuration: {0}")]
    Malformed(String),
}

/// Failures of the external history cursors and the destination sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("history read failed: {0}")]
    Read(String),
    #[error("sink write failed: {0}")]
    Write(String),
}

/// Fatal stream-processing failures. There is no per-event recovery; any of
/// these aborts the whole migration run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A retained event still references a skipped identity. This is a
    /// reference-repair policy defect, not a data problem.
    #[error("retained {kind} event for {owner} still references skipped {target} via `{attribute}`")]
    DanglingReference {
        kind: &'static str,
        owner: ObjectIdentity,
        attribute: String,
        target: ObjectIdentity,
    },
    #[error("revision shift of {offset} is out of range for {revision}")]
    RevisionShiftOutOfRange { revision: Revision, offset: i64 },
}
