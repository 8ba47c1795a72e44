//! Update descriptor action
//!
//! Merges a partial field set into one descriptor. Used by side-panel edits
//! and by transform reconciliation after a gizmo drag.

use crate::action::Action;
use crate::descriptor::{DescriptorId, DescriptorPatch, ObjectDescriptor};
use crate::edit::EditSession;

pub struct UpdateDescriptorAction {
    id: DescriptorId,
    patch: DescriptorPatch,

    /// Descriptor before the first execution
    previous: Option<ObjectDescriptor>,

    /// Label shown in the undo menu
    label: &'static str,
}

impl UpdateDescriptorAction {
    pub fn new(id: DescriptorId, patch: DescriptorPatch) -> Self {
        Self {
            id,
            patch,
            previous: None,
            label: "Edit shape",
        }
    }

    /// Same update, labelled as coming from the transform gizmo
    pub fn transform(id: DescriptorId, patch: DescriptorPatch) -> Self {
        Self {
            label: "Transform shape",
            ..Self::new(id, patch)
        }
    }
}

impl Action for UpdateDescriptorAction {
    fn execute(&mut self, session: &mut EditSession) {
        let previous = session.update(&self.id, &self.patch);
        if self.previous.is_none() {
            self.previous = previous;
        }
    }

    fn rollback(&mut self, session: &mut EditSession) {
        if let Some(previous) = &self.previous {
            session.restore(previous.clone());
        }
    }

    fn description(&self) -> String {
        self.label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ShapeKind;

    #[test]
    fn test_update_and_rollback() {
        let cube = ObjectDescriptor::new(ShapeKind::Cube);
        let id = cube.id.clone();
        let mut session = EditSession::from_descriptors(vec![cube.clone()]);

        let mut action = UpdateDescriptorAction::new(id.clone(), DescriptorPatch::size(vec![2.0, 1.0, 3.0]));
        action.execute(&mut session);
        assert_eq!(session.store().get(&id).unwrap().size, vec![2.0, 1.0, 3.0]);

        action.rollback(&mut session);
        assert_eq!(session.store().get(&id), Some(&cube));

        // Redo keeps the original snapshot for the next rollback
        action.execute(&mut session);
        action.rollback(&mut session);
        assert_eq!(session.store().get(&id), Some(&cube));
    }

    #[test]
    fn test_transform_label() {
        let action = UpdateDescriptorAction::transform("x".into(), DescriptorPatch::position([1.0, 0.0, 0.0]));
        assert_eq!(action.description(), "Transform shape");
    }
}
