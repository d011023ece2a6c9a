use crate::error::ConfigError;
use crate::event_model::{AttributeValue, ObjectCreation, SkippedIdentifiers};
use std::collections::BTreeSet;

/// Decides whether a creation event must be dropped. Pure and read-only over
/// its inputs; the skipped set is a shared view, never a mutable handle.
pub trait SkipPolicy {
    fn should_skip(&self, creation: &ObjectCreation, skipped: &SkippedIdentifiers) -> bool;
}

/// Skips creations whose declared type is in a configured set.
#[derive(Debug, Clone)]
pub struct TypeNameSkip {
    type_names: BTreeSet<String>,
}

impl TypeNameSkip {
    pub fn new(type_names: BTreeSet<String>) -> Result<Self, ConfigError> {
        if type_names.is_empty() {
            return Err(ConfigError::EmptyTypeSet);
        }
        Ok(Self { type_names })
    }
}

impl SkipPolicy for TypeNameSkip {
    fn should_skip(&self, creation: &ObjectCreation, _skipped: &SkippedIdentifiers) -> bool {
        self.type_names.contains(&creation.identity.type_name)
    }
}

/// Skips creations of model-definition objects whose definition name is in a
/// configured set. Definition objects are recognized by their declared type
/// (e.g. a class or attribute definition type); the definition name is the
/// object's `name` attribute, falling back to its object name.
#[derive(Debug, Clone)]
pub struct ModelDefinitionSkip {
    definition_types: BTreeSet<String>,
    definition_names: BTreeSet<String>,
}

impl ModelDefinitionSkip {
    pub fn new(
        definition_types: BTreeSet<String>,
        definition_names: BTreeSet<String>,
    ) -> Result<Self, ConfigError> {
        if definition_types.is_empty() {
            return Err(ConfigError::EmptyDefinitionTypeSet);
        }
        if definition_names.is_empty() {
            return Err(ConfigError::EmptyDefinitionSet);
        }
        Ok(Self {
            definition_types,
            definition_names,
        })
    }

    fn definition_name<'a>(creation: &'a ObjectCreation) -> &'a str {
        match creation.values.get("name") {
            Some(AttributeValue::Text(name)) => name,
            _ => &creation.identity.object_name,
        }
    }
}

impl SkipPolicy for ModelDefinitionSkip {
    fn should_skip(&self, creation: &ObjectCreation, _skipped: &SkippedIdentifiers) -> bool {
        self.definition_types.contains(&creation.identity.type_name)
            && self
                .definition_names
                .contains(Self::definition_name(creation))
    }
}

/// Conjunction of an ordered list of sub-policies: skips only when every
/// sub-policy agrees.
pub struct AllOfSkip {
    policies: Vec<Box<dyn SkipPolicy>>,
}

impl AllOfSkip {
    pub fn new(policies: Vec<Box<dyn SkipPolicy>>) -> Result<Self, ConfigError> {
        if policies.is_empty() {
            return Err(ConfigError::EmptyComposition);
        }
        Ok(Self { policies })
    }
}

impl SkipPolicy for AllOfSkip {
    fn should_skip(&self, creation: &ObjectCreation, skipped: &SkippedIdentifiers) -> bool {
        self.policies
            .iter()
            .all(|policy| policy.should_skip(creation, skipped))
    }
}

/// Keeps everything. The rewriter then only cascades omissions recorded by
/// earlier change sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl SkipPolicy for KeepAll {
    fn should_skip(&self, _creation: &ObjectCreation, _skipped: &SkippedIdentifiers) -> bool {
        false
    }
}
