use crate::event_model::{
    ItemUpdate, ObjectCreation, ReferenceAttribute, SkippedIdentifiers,
};

/// Decides what to do with a dangling reference: an attribute value pointing
/// at an identity that was already skipped. Returning `true` means "skip the
/// whole owning event"; returning `false` means the policy repaired the
/// event in place and it stays.
pub trait ReferenceRepairPolicy {
    fn on_creation_dangling(
        &self,
        creation: &mut ObjectCreation,
        attribute: &ReferenceAttribute,
        skipped: &SkippedIdentifiers,
    ) -> bool;

    fn on_update_dangling(
        &self,
        update: &mut ItemUpdate,
        attribute: &ReferenceAttribute,
        skipped: &SkippedIdentifiers,
    ) -> bool;
}

/// Default repair policy: a dangling mandatory reference forces the owning
/// event out; a non-mandatory one is nulled in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandatoryAwareRepair;

impl ReferenceRepairPolicy for MandatoryAwareRepair {
    fn on_creation_dangling(
        &self,
        creation: &mut ObjectCreation,
        attribute: &ReferenceAttribute,
        _skipped: &SkippedIdentifiers,
    ) -> bool {
        if attribute.mandatory {
            return true;
        }
        creation.clear_attribute(&attribute.name);
        false
    }

    fn on_update_dangling(
        &self,
        update: &mut ItemUpdate,
        attribute: &ReferenceAttribute,
        _skipped: &SkippedIdentifiers,
    ) -> bool {
        if attribute.mandatory {
            // Strip the before-image as well so no phantom transition of the
            // suppressed update leaks downstream.
            update.clear_old_value(&attribute.name);
            return true;
        }
        update.clear_attribute(&attribute.name);
        false
    }
}
