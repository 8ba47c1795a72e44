//! Action implementations for descriptor editing
//!
//! Concrete action types executed through [`crate::action::ActionExecutor`].

pub mod add_descriptor;
pub mod remove_descriptor;
pub mod update_descriptor;

pub use add_descriptor::AddDescriptorAction;
pub use remove_descriptor::RemoveDescriptorAction;
pub use update_descriptor::UpdateDescriptorAction;
