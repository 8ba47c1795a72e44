//! Edit session
//!
//! Pairs the descriptor store with the selection so the rules that span both
//! (removing a descriptor drops its selection, selecting requires the
//! descriptor to exist) hold no matter which caller mutates the session.

use crate::descriptor::{DescriptorId, DescriptorPatch, ObjectDescriptor};
use crate::selection::{Selection, SelectionInput};
use crate::store::DescriptorStore;

#[derive(Clone, Debug, Default)]
pub struct EditSession {
    store: DescriptorStore,
    selection: Selection,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: Vec<ObjectDescriptor>) -> Self {
        Self {
            store: DescriptorStore::from_descriptors(descriptors),
            selection: Selection::new(),
        }
    }

    pub fn store(&self) -> &DescriptorStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn descriptors(&self) -> &[ObjectDescriptor] {
        self.store.as_slice()
    }

    /// The selected descriptor, if any
    pub fn selected(&self) -> Option<&ObjectDescriptor> {
        self.selection.selected().and_then(|id| self.store.get(id))
    }

    pub fn add(&mut self, descriptor: ObjectDescriptor) -> bool {
        self.store.add(descriptor)
    }

    /// Remove a descriptor, clearing the selection if it pointed at it
    pub fn remove(&mut self, id: &DescriptorId) -> Option<(usize, ObjectDescriptor)> {
        let removed = self.store.remove(id)?;
        self.selection.forget(id);
        Some(removed)
    }

    pub fn update(&mut self, id: &DescriptorId, patch: &DescriptorPatch) -> Option<ObjectDescriptor> {
        self.store.update(id, patch)
    }

    /// Swap in a freshly loaded sequence; any selection is dropped
    pub fn replace_all(&mut self, descriptors: Vec<ObjectDescriptor>) {
        self.store.replace_all(descriptors);
        self.selection.deselect();
    }

    pub fn select(&mut self, id: &DescriptorId) {
        self.selection.select(&self.store, id);
    }

    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    pub fn apply_selection(&mut self, input: &SelectionInput) {
        self.selection.apply(&self.store, input);
    }

    pub(crate) fn insert_at(&mut self, index: usize, descriptor: ObjectDescriptor) -> bool {
        self.store.insert_at(index, descriptor)
    }

    pub(crate) fn restore(&mut self, descriptor: ObjectDescriptor) {
        self.store.restore(descriptor);
    }

    pub(crate) fn revalidate_selection(&mut self) {
        self.selection.revalidate(&self.store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ShapeKind;

    #[test]
    fn test_remove_then_select_leaves_nothing_selected() {
        let cube = ObjectDescriptor::new(ShapeKind::Cube);
        let id = cube.id.clone();
        let mut session = EditSession::from_descriptors(vec![cube]);

        session.select(&id);
        assert!(session.selection().is_selected(&id));

        session.remove(&id);
        assert!(session.selection().is_empty());

        session.select(&id);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let a = ObjectDescriptor::new(ShapeKind::Cube);
        let b = ObjectDescriptor::new(ShapeKind::Sphere);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        let mut session = EditSession::from_descriptors(vec![a, b]);

        session.select(&a_id);
        session.remove(&b_id);
        assert_eq!(session.selected().map(|d| &d.id), Some(&a_id));
    }

    #[test]
    fn test_replace_all_clears_selection() {
        let cube = ObjectDescriptor::new(ShapeKind::Cube);
        let id = cube.id.clone();
        let mut session = EditSession::from_descriptors(vec![cube.clone()]);
        session.select(&id);

        session.replace_all(vec![cube]);
        assert!(session.selection().is_empty());
        assert_eq!(session.descriptors().len(), 1);
    }
}
