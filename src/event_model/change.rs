use super::identity::{ObjectIdentity, ObjectKey, Revision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed value space for object attributes. A key absent from a value map
/// means the attribute is null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Reference(ObjectKey),
}

impl AttributeValue {
    /// Returns the referenced key if this value is a reference.
    pub fn as_reference(&self) -> Option<&ObjectKey> {
        match self {
            AttributeValue::Reference(key) => Some(key),
            _ => None,
        }
    }
}

/// Attribute name to value mapping carried by creations and updates.
pub type AttributeValues = BTreeMap<String, AttributeValue>;

/// Creation of an object with its full initial attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCreation {
    pub identity: ObjectIdentity,
    pub revision: Revision,
    pub values: AttributeValues,
}

impl ObjectCreation {
    pub fn new(identity: ObjectIdentity, revision: Revision, values: AttributeValues) -> Self {
        Self {
            identity,
            revision,
            values,
        }
    }

    /// Returns the reference value of the named attribute, if set.
    pub fn reference(&self, attribute: &str) -> Option<&ObjectKey> {
        self.values
            .get(attribute)
            .and_then(AttributeValue::as_reference)
    }

    /// Nulls the named attribute.
    pub fn clear_attribute(&mut self, attribute: &str) {
        self.values.remove(attribute);
    }
}

/// Update of an object carrying the changed values and optionally the values
/// they replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub identity: ObjectIdentity,
    pub revision: Revision,
    pub values: AttributeValues,
    pub old_values: Option<AttributeValues>,
}

impl ItemUpdate {
    pub fn new(identity: ObjectIdentity, revision: Revision, values: AttributeValues) -> Self {
        Self {
            identity,
            revision,
            values,
            old_values: None,
        }
    }

    /// Attaches the previous values replaced by this update.
    pub fn with_old_values(mut self, old_values: AttributeValues) -> Self {
        self.old_values = Some(old_values);
        self
    }

    /// Returns the changed reference value of the named attribute, if set.
    pub fn reference(&self, attribute: &str) -> Option<&ObjectKey> {
        self.values
            .get(attribute)
            .and_then(AttributeValue::as_reference)
    }

    /// Nulls the named attribute in the changed values.
    pub fn clear_attribute(&mut self, attribute: &str) {
        self.values.remove(attribute);
    }

    /// Removes the named attribute from the previous values, if recorded.
    pub fn clear_old_value(&mut self, attribute: &str) {
        if let Some(old) = self.old_values.as_mut() {
            old.remove(attribute);
        }
    }
}

/// Deletion of an object; carries only its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeletion {
    pub identity: ObjectIdentity,
    pub revision: Revision,
}

impl ItemDeletion {
    pub fn new(identity: ObjectIdentity, revision: Revision) -> Self {
        Self { identity, revision }
    }
}

/// Tagged union over the three event kinds of a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEvent {
    Creation(ObjectCreation),
    Update(ItemUpdate),
    Deletion(ItemDeletion),
}

impl ItemEvent {
    /// Version-independent identity of the affected object.
    pub fn identity(&self) -> &ObjectIdentity {
        match self {
            ItemEvent::Creation(event) => &event.identity,
            ItemEvent::Update(event) => &event.identity,
            ItemEvent::Deletion(event) => &event.identity,
        }
    }

    /// Declared type name of the affected object.
    pub fn type_name(&self) -> &str {
        &self.identity().type_name
    }

    /// Revision stamp of this event.
    pub fn revision(&self) -> Revision {
        match self {
            ItemEvent::Creation(event) => event.revision,
            ItemEvent::Update(event) => event.revision,
            ItemEvent::Deletion(event) => event.revision,
        }
    }

    /// Renumbers this event. Rewriters stamp replayed events with the
    /// revision they are collapsed into.
    pub fn set_revision(&mut self, revision: Revision) {
        match self {
            ItemEvent::Creation(event) => event.revision = revision,
            ItemEvent::Update(event) => event.revision = revision,
            ItemEvent::Deletion(event) => event.revision = revision,
        }
    }
}

/// Ordered bundle of events sharing one revision. The revision is mutable;
/// rewriters may renumber a change set together with its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub revision: Revision,
    pub events: Vec<ItemEvent>,
}

impl ChangeSet {
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            events: Vec::new(),
        }
    }

    /// Appends an event, stamping it with this change set's revision.
    pub fn push(&mut self, mut event: ItemEvent) -> &mut Self {
        event.set_revision(self.revision);
        self.events.push(event);
        self
    }

    /// Renumbers the bundle and every contained event.
    pub fn set_revision(&mut self, revision: Revision) {
        self.revision = revision;
        for event in &mut self.events {
            event.set_revision(revision);
        }
    }

    /// True when no events remain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events in the bundle.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Iterates the creation events in bundle order.
    pub fn creations(&self) -> impl Iterator<Item = &ObjectCreation> {
        self.events.iter().filter_map(|event| match event {
            ItemEvent::Creation(creation) => Some(creation),
            _ => None,
        })
    }
}
