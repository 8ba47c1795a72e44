//! Error types
//!
//! Every failure the editor can hit ends up as a one-line status message.
//! `user_message` picks the server's own text when it sent one and otherwise
//! falls back to the operation's generic message.

use thiserror::Error;

pub const LOAD_FAILED: &str = "Failed to load layout. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save layout. Please try again.";
pub const CREATE_FAILED: &str = "Failed to create layout. Please try again.";
pub const LIST_FAILED: &str = "Failed to fetch layouts. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete layout. Please try again.";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// The `error` text the server attached to the response, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Validation(message) | GatewayError::Server { message, .. }
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Line to show the user; a rejected token asks for a fresh login
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Unauthorized => SESSION_EXPIRED.to_string(),
            _ => self.server_message().unwrap_or(fallback).to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No data directory available on this platform")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to persist session: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::PasswordMismatch => PASSWORD_MISMATCH.to_string(),
            // Rejected credentials, not an expired session
            AuthError::Gateway(GatewayError::Unauthorized) => fallback.to_string(),
            AuthError::Gateway(err) => err.user_message(fallback),
            AuthError::Session(_) => fallback.to_string(),
        }
    }
}
