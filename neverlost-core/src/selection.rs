//! Selection state management
//!
//! Tracks the single selected descriptor. Both the shape list and the canvas
//! feed into [`Selection::apply`], so the at-most-one invariant lives in one
//! place no matter where the click came from.

use crate::descriptor::DescriptorId;
use crate::store::DescriptorStore;
use serde::{Deserialize, Serialize};

/// Where a selection change came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionInput {
    /// A row of the shape list was clicked
    ListItem(DescriptorId),

    /// The canvas was clicked; `None` means the pick hit empty space
    CanvasHit(Option<DescriptorId>),

    /// The side panel's "Deselect" button
    Clear,
}

/// Selection state for the editor
///
/// Kept apart from the store so it can be handed to UI code without mutable
/// access to the descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<DescriptorId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if the store has it, otherwise clear the selection
    ///
    /// Any previous selection is replaced.
    pub fn select(&mut self, store: &DescriptorStore, id: &DescriptorId) {
        if store.contains(id) {
            log::debug!("Selected {}", id);
            self.selected = Some(id.clone());
        } else {
            log::debug!("Select of unknown id {} clears selection", id);
            self.selected = None;
        }
    }

    /// Clear the selection unconditionally
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Clear the selection only if it points at `id`
    pub fn forget(&mut self, id: &DescriptorId) {
        if self.is_selected(id) {
            self.selected = None;
        }
    }

    /// Drop the selection if its descriptor no longer exists
    pub fn revalidate(&mut self, store: &DescriptorStore) {
        if let Some(id) = &self.selected {
            if !store.contains(id) {
                self.selected = None;
            }
        }
    }

    /// Route an input event to select/deselect
    pub fn apply(&mut self, store: &DescriptorStore, input: &SelectionInput) {
        match input {
            SelectionInput::ListItem(id) | SelectionInput::CanvasHit(Some(id)) => {
                self.select(store, id)
            }
            SelectionInput::CanvasHit(None) | SelectionInput::Clear => self.deselect(),
        }
    }

    pub fn selected(&self) -> Option<&DescriptorId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &DescriptorId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}
