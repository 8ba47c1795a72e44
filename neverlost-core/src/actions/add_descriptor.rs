//! Add descriptor action
//!
//! Appends a new shape to the layout.

use crate::action::Action;
use crate::descriptor::ObjectDescriptor;
use crate::edit::EditSession;

/// Action that appends a descriptor to the session
pub struct AddDescriptorAction {
    descriptor: ObjectDescriptor,

    /// Whether execute actually added it (false on id collision)
    added: bool,
}

impl AddDescriptorAction {
    pub fn new(descriptor: ObjectDescriptor) -> Self {
        Self {
            descriptor,
            added: false,
        }
    }
}

impl Action for AddDescriptorAction {
    fn execute(&mut self, session: &mut EditSession) {
        self.added = session.add(self.descriptor.clone());
    }

    fn rollback(&mut self, session: &mut EditSession) {
        if self.added {
            session.remove(&self.descriptor.id);
            self.added = false;
        }
    }

    fn description(&self) -> String {
        format!("Add {}", self.descriptor.kind)
    }
}
