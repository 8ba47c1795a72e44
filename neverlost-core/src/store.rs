//! Object descriptor store
//!
//! Ordered sequence of descriptors owned by the editing screen for the length
//! of an edit session. The store enforces id uniqueness and nothing else:
//! field ranges (negative sizes, odd colors) are the caller's business.

use crate::descriptor::{DescriptorId, DescriptorPatch, ObjectDescriptor};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptorStore {
    descriptors: Vec<ObjectDescriptor>,
}

impl DescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: Vec<ObjectDescriptor>) -> Self {
        let mut store = Self::new();
        store.replace_all(descriptors);
        store
    }

    /// Append a descriptor
    ///
    /// Returns false (and leaves the store unchanged) if the id is already
    /// present.
    pub fn add(&mut self, descriptor: ObjectDescriptor) -> bool {
        if self.contains(&descriptor.id) {
            log::warn!("Ignoring descriptor with duplicate id {}", descriptor.id);
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    /// Remove the descriptor with `id`, returning it with its former index
    pub fn remove(&mut self, id: &DescriptorId) -> Option<(usize, ObjectDescriptor)> {
        let index = self.position_of(id)?;
        Some((index, self.descriptors.remove(index)))
    }

    /// Merge `patch` into the descriptor with `id`
    ///
    /// Returns the descriptor as it was before the merge, or `None` when the
    /// id is absent (in which case nothing happens).
    pub fn update(&mut self, id: &DescriptorId, patch: &DescriptorPatch) -> Option<ObjectDescriptor> {
        let descriptor = self.descriptors.iter_mut().find(|d| &d.id == id)?;
        let previous = descriptor.clone();
        patch.apply_to(descriptor);
        Some(previous)
    }

    /// Replace the whole sequence (used when a layout is loaded)
    ///
    /// Later duplicates of an id are dropped so the uniqueness invariant holds
    /// even for data written by a misbehaving client.
    pub fn replace_all(&mut self, descriptors: Vec<ObjectDescriptor>) {
        self.descriptors.clear();
        for descriptor in descriptors {
            self.add(descriptor);
        }
    }

    /// Put a descriptor back at a specific index (undo of a removal)
    pub(crate) fn insert_at(&mut self, index: usize, descriptor: ObjectDescriptor) -> bool {
        if self.contains(&descriptor.id) {
            return false;
        }
        let index = index.min(self.descriptors.len());
        self.descriptors.insert(index, descriptor);
        true
    }

    /// Overwrite a descriptor wholesale (undo of an update)
    pub(crate) fn restore(&mut self, descriptor: ObjectDescriptor) {
        if let Some(slot) = self.descriptors.iter_mut().find(|d| d.id == descriptor.id) {
            *slot = descriptor;
        }
    }

    pub fn get(&self, id: &DescriptorId) -> Option<&ObjectDescriptor> {
        self.descriptors.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DescriptorId) -> bool {
        self.get(id).is_some()
    }

    pub fn position_of(&self, id: &DescriptorId) -> Option<usize> {
        self.descriptors.iter().position(|d| &d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectDescriptor> {
        self.descriptors.iter()
    }

    pub fn as_slice(&self) -> &[ObjectDescriptor] {
        &self.descriptors
    }

    pub fn to_vec(&self) -> Vec<ObjectDescriptor> {
        self.descriptors.clone()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ShapeKind;

    fn cube(id: &str) -> ObjectDescriptor {
        ObjectDescriptor::with_id(id.into(), ShapeKind::Cube)
    }

    #[test]
    fn test_add_keeps_order_and_rejects_duplicates() {
        let mut store = DescriptorStore::new();
        assert!(store.add(cube("a")));
        assert!(store.add(cube("b")));
        assert!(!store.add(cube("a")));

        let ids: Vec<&str> = store.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = DescriptorStore::from_descriptors(vec![cube("a")]);
        assert!(store.remove(&"zzz".into()).is_none());
        assert_eq!(store.len(), 1);

        let (index, removed) = store.remove(&"a".into()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(removed.id.as_str(), "a");
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_color_only_touches_color() {
        let mut store = DescriptorStore::from_descriptors(vec![cube("a")]);
        let before = store.get(&"a".into()).unwrap().clone();

        let previous = store.update(&"a".into(), &DescriptorPatch::color("#abcdef"));
        assert_eq!(previous.as_ref(), Some(&before));

        let after = store.get(&"a".into()).unwrap();
        assert_eq!(after.color, "#abcdef");
        assert_eq!(after.id, before.id);
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.position, before.position);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(after.scale, before.scale);
        assert_eq!(after.size, before.size);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = DescriptorStore::from_descriptors(vec![cube("a")]);
        let snapshot = store.clone();
        assert!(store.update(&"b".into(), &DescriptorPatch::color("#000000")).is_none());
        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_replace_all_drops_duplicate_ids() {
        let mut store = DescriptorStore::from_descriptors(vec![cube("old")]);
        store.replace_all(vec![cube("x"), cube("y"), cube("x")]);
        assert_eq!(store.len(), 2);
        assert!(!store.contains(&"old".into()));
    }

    #[test]
    fn test_insert_at_restores_index() {
        let mut store = DescriptorStore::from_descriptors(vec![cube("a"), cube("b"), cube("c")]);
        let (index, removed) = store.remove(&"b".into()).unwrap();
        assert!(store.insert_at(index, removed));
        assert_eq!(store.position_of(&"b".into()), Some(1));
    }
}
