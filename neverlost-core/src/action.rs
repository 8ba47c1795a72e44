//! Action system for undo/redo
//!
//! Every descriptor mutation the editor performs is wrapped in an [`Action`]
//! and run through the [`ActionExecutor`], which keeps the undo and redo
//! stacks and tracks whether the session has unsaved changes.
//!
//! Selection changes are not actions: they don't alter the layout and are
//! not undone.

use crate::descriptor::ObjectDescriptor;
use crate::edit::EditSession;
use crate::selection::SelectionInput;

/// Default number of actions kept for undo
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// A reversible change to an edit session
pub trait Action: Send {
    /// Apply this action to the session
    fn execute(&mut self, session: &mut EditSession);

    /// Undo this action
    fn rollback(&mut self, session: &mut EditSession);

    /// Human-readable description (for the undo/redo menu)
    fn description(&self) -> String;
}

/// Owns the edit session and its history
///
/// This is the only holder of `&mut EditSession` in the editor, so every
/// change to the descriptors is recorded.
pub struct ActionExecutor {
    session: EditSession,
    undo_stack: Vec<Box<dyn Action>>,
    redo_stack: Vec<Box<dyn Action>>,
    max_undo_depth: usize,
    dirty: bool,
}

impl ActionExecutor {
    pub fn new(session: EditSession) -> Self {
        Self {
            session,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_depth: DEFAULT_UNDO_DEPTH,
            dirty: false,
        }
    }

    /// Read-only access to the session
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Execute an action and push it on the undo stack
    ///
    /// Clears the redo stack since a new branch of history starts here.
    pub fn execute(&mut self, mut action: Box<dyn Action>) {
        log::debug!("Executing: {}", action.description());
        action.execute(&mut self.session);

        self.redo_stack.clear();
        self.undo_stack.push(action);
        if self.undo_stack.len() > self.max_undo_depth {
            self.undo_stack.remove(0);
        }
        self.dirty = true;
    }

    /// Undo the last action; false if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        if let Some(mut action) = self.undo_stack.pop() {
            log::debug!("Undo: {}", action.description());
            action.rollback(&mut self.session);
            self.session.revalidate_selection();
            self.redo_stack.push(action);
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Redo the last undone action; false if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        if let Some(mut action) = self.redo_stack.pop() {
            log::debug!("Redo: {}", action.description());
            action.execute(&mut self.session);
            self.session.revalidate_selection();
            self.undo_stack.push(action);
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Replace the descriptors with a freshly loaded sequence
    ///
    /// History is dropped: undoing past a load would resurrect another
    /// layout's objects.
    pub fn load(&mut self, descriptors: Vec<ObjectDescriptor>) {
        self.session.replace_all(descriptors);
        self.clear_history();
        self.dirty = false;
    }

    pub fn apply_selection(&mut self, input: &SelectionInput) {
        self.session.apply_selection(input);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|a| a.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|a| a.description())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn set_max_undo_depth(&mut self, depth: usize) {
        self.max_undo_depth = depth;
        if self.undo_stack.len() > depth {
            let remove_count = self.undo_stack.len() - depth;
            self.undo_stack.drain(0..remove_count);
        }
    }

    /// Whether there are changes not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current descriptors match the persisted copy
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAction {
        description: String,
        executed: bool,
    }

    impl TestAction {
        fn new(description: &str) -> Self {
            Self {
                description: description.to_string(),
                executed: false,
            }
        }
    }

    impl Action for TestAction {
        fn execute(&mut self, _session: &mut EditSession) {
            self.executed = true;
        }

        fn rollback(&mut self, _session: &mut EditSession) {
            self.executed = false;
        }

        fn description(&self) -> String {
            self.description.clone()
        }
    }

    #[test]
    fn test_action_executor_basic() {
        let mut executor = ActionExecutor::new(EditSession::new());

        assert!(!executor.can_undo());
        assert!(!executor.can_redo());
        assert!(!executor.is_dirty());

        executor.execute(Box::new(TestAction::new("Test Action")));
        assert!(executor.can_undo());
        assert!(executor.is_dirty());

        assert!(executor.undo());
        assert!(!executor.can_undo());
        assert!(executor.can_redo());

        assert!(executor.redo());
        assert!(executor.can_undo());
        assert!(!executor.can_redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut executor = ActionExecutor::new(EditSession::new());

        executor.execute(Box::new(TestAction::new("Action 1")));
        executor.execute(Box::new(TestAction::new("Action 2")));
        executor.undo();
        assert!(executor.can_redo());

        executor.execute(Box::new(TestAction::new("Action 3")));
        assert!(!executor.can_redo());
        assert_eq!(executor.undo_depth(), 2);
        assert_eq!(executor.undo_description(), Some("Action 3".to_string()));
    }

    #[test]
    fn test_max_undo_depth() {
        let mut executor = ActionExecutor::new(EditSession::new());
        executor.set_max_undo_depth(3);

        for i in 1..=4 {
            executor.execute(Box::new(TestAction::new(&format!("Action {}", i))));
        }

        assert_eq!(executor.undo_depth(), 3);
        assert_eq!(executor.undo_description(), Some("Action 4".to_string()));
    }

    #[test]
    fn test_load_resets_history_and_dirty() {
        let mut executor = ActionExecutor::new(EditSession::new());
        executor.execute(Box::new(TestAction::new("Action 1")));

        executor.load(Vec::new());
        assert!(!executor.can_undo());
        assert!(!executor.is_dirty());
    }
}
