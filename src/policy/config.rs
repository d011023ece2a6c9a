use super::repair::{MandatoryAwareRepair, ReferenceRepairPolicy};
use super::skip::{AllOfSkip, KeepAll, ModelDefinitionSkip, SkipPolicy, TypeNameSkip};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declarative skip-policy selection. A closed set of named kinds resolved
/// once at construction; there is no runtime reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SkipPolicyConfig {
    /// Drop creations of the named types.
    TypeNames { types: BTreeSet<String> },
    /// Drop creations of model-definition objects with the named definition
    /// names.
    ModelDefinitions {
        definition_types: BTreeSet<String>,
        names: BTreeSet<String>,
    },
    /// Drop only when every sub-policy agrees.
    AllOf { policies: Vec<SkipPolicyConfig> },
    /// Keep every creation; only cascaded omissions apply.
    KeepAll,
}

impl SkipPolicyConfig {
    /// Parses a policy selection from a JSON configuration blob.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|err| ConfigError::Malformed(err.to_string()))
    }

    /// Resolves the configuration into a policy, failing on invalid
    /// compositions before any stream processing begins.
    pub fn build(&self) -> Result<Box<dyn SkipPolicy>, ConfigError> {
        match self {
            SkipPolicyConfig::TypeNames { types } => {
                Ok(Box::new(TypeNameSkip::new(types.clone())?))
            }
            SkipPolicyConfig::ModelDefinitions {
                definition_types,
                names,
            } => Ok(Box::new(ModelDefinitionSkip::new(
                definition_types.clone(),
                names.clone(),
            )?)),
            SkipPolicyConfig::AllOf { policies } => {
                let mut built = Vec::with_capacity(policies.len());
                for policy in policies {
                    built.push(policy.build()?);
                }
                Ok(Box::new(AllOfSkip::new(built)?))
            }
            SkipPolicyConfig::KeepAll => Ok(Box::new(KeepAll)),
        }
    }
}

/// Declarative reference-repair selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RepairPolicyConfig {
    /// Force-skip owners of dangling mandatory references; null dangling
    /// non-mandatory ones.
    MandatoryAware,
}

impl RepairPolicyConfig {
    /// Parses a repair-policy selection from a JSON configuration blob.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|err| ConfigError::Malformed(err.to_string()))
    }

    pub fn build(&self) -> Result<Box<dyn ReferenceRepairPolicy>, ConfigError> {
        match self {
            RepairPolicyConfig::MandatoryAware => Ok(Box::new(MandatoryAwareRepair)),
        }
    }
}
