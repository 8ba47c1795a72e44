// NeverLost Core Library
// Layout data model, editing state and persistence

pub mod descriptor;
pub mod store;
pub mod selection;
pub mod edit;
pub mod action;
pub mod actions;
pub mod scene;
pub mod gizmo;
pub mod layout;
pub mod error;
pub mod session;
pub mod gateway;
pub mod editor;
pub mod auth;
