use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata of a typed reference attribute. A mandatory reference must always
/// resolve to a valid object in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAttribute {
    pub name: String,
    pub mandatory: bool,
}

impl ReferenceAttribute {
    pub fn new(name: impl Into<String>, mandatory: bool) -> Self {
        Self {
            name: name.into(),
            mandatory,
        }
    }
}

/// Provider of per-type reference-attribute metadata. Owned by the
/// surrounding store; rewriters only read it.
pub trait TypeMetadata {
    /// The ordered reference attributes declared by the named type. Types
    /// without reference attributes yield an empty slice.
    fn reference_attributes(&self, type_name: &str) -> &[ReferenceAttribute];
}

/// In-memory metadata table built once at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeMetadata {
    attributes: HashMap<String, Vec<ReferenceAttribute>>,
}

impl StaticTypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the reference attributes of a type, replacing any previous
    /// declaration.
    pub fn with_type(
        mut self,
        type_name: impl Into<String>,
        attributes: Vec<ReferenceAttribute>,
    ) -> Self {
        self.attributes.insert(type_name.into(), attributes);
        self
    }
}

impl TypeMetadata for StaticTypeMetadata {
    fn reference_attributes(&self, type_name: &str) -> &[ReferenceAttribute] {
        self.attributes
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
