//! Remove descriptor action
//!
//! Deletes a shape from the layout. Undo puts it back at its former index.

use crate::action::Action;
use crate::descriptor::{DescriptorId, ObjectDescriptor};
use crate::edit::EditSession;

pub struct RemoveDescriptorAction {
    id: DescriptorId,

    /// Removed descriptor and its index (set after execution)
    removed: Option<(usize, ObjectDescriptor)>,
}

impl RemoveDescriptorAction {
    pub fn new(id: DescriptorId) -> Self {
        Self { id, removed: None }
    }
}

impl Action for RemoveDescriptorAction {
    fn execute(&mut self, session: &mut EditSession) {
        self.removed = session.remove(&self.id);
    }

    fn rollback(&mut self, session: &mut EditSession) {
        if let Some((index, descriptor)) = self.removed.take() {
            session.insert_at(index, descriptor);
        }
    }

    fn description(&self) -> String {
        match &self.removed {
            Some((_, descriptor)) => format!("Remove {}", descriptor.kind),
            None => "Remove shape".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ShapeKind;

    #[test]
    fn test_remove_and_rollback_restores_order() {
        let a = ObjectDescriptor::new(ShapeKind::Cube);
        let b = ObjectDescriptor::new(ShapeKind::Sphere);
        let c = ObjectDescriptor::new(ShapeKind::Rectangle);
        let b_id = b.id.clone();
        let mut session = EditSession::from_descriptors(vec![a, b, c]);
        session.select(&b_id);

        let mut action = RemoveDescriptorAction::new(b_id.clone());
        action.execute(&mut session);
        assert_eq!(session.descriptors().len(), 2);
        assert!(session.selection().is_empty());
        assert_eq!(action.description(), "Remove sphere");

        action.rollback(&mut session);
        assert_eq!(session.store().position_of(&b_id), Some(1));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut session = EditSession::from_descriptors(vec![ObjectDescriptor::new(ShapeKind::Cube)]);
        let mut action = RemoveDescriptorAction::new("nope".into());
        action.execute(&mut session);
        action.rollback(&mut session);
        assert_eq!(session.descriptors().len(), 1);
    }
}
