//! Identity and event model shared by every rewriter: branches, revisions,
//! object identities, change sets, reference metadata, and the run-scoped
//! tracking sets.

pub mod change;
pub mod identity;
pub mod metadata;
pub mod tracking;

pub use change::{
    AttributeValue, AttributeValues, ChangeSet, ItemDeletion, ItemEvent, ItemUpdate,
    ObjectCreation,
};
pub use identity::{Branch, ObjectIdentity, ObjectKey, Revision};
pub use metadata::{ReferenceAttribute, StaticTypeMetadata, TypeMetadata};
pub use tracking::{ReplayKey, ReplayedEventKeys, SkippedIdentifiers};
