//! Skip and reference-repair policies, plus their declarative construction.
//! Policies are pure predicates over events and the shared omission record;
//! all composition happens once, at construction.

pub mod config;
pub mod repair;
pub mod skip;

pub use config::{RepairPolicyConfig, SkipPolicyConfig};
pub use repair::{MandatoryAwareRepair, ReferenceRepairPolicy};
pub use skip::{AllOfSkip, KeepAll, ModelDefinitionSkip, SkipPolicy, TypeNameSkip};
