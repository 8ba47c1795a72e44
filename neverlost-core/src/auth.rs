//! Login and registration flows

use crate::error::AuthError;
use crate::gateway::LayoutGateway;
use crate::session::SessionContext;

/// Fields of the registration form
#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

/// Register a new account and log straight into it
///
/// A mismatched confirmation is rejected before anything is sent.
pub async fn register<G: LayoutGateway + ?Sized>(
    gateway: &G,
    session: &mut SessionContext,
    form: &RegisterForm,
) -> Result<(), AuthError> {
    if !form.passwords_match() {
        return Err(AuthError::PasswordMismatch);
    }

    let response = gateway
        .register(&form.username, &form.email, &form.password)
        .await
        .inspect_err(|e| log::warn!("Registration failed: {}", e))?;
    session.login(response.user, response.token)?;
    Ok(())
}

pub async fn login<G: LayoutGateway + ?Sized>(
    gateway: &G,
    session: &mut SessionContext,
    email: &str,
    password: &str,
) -> Result<(), AuthError> {
    let response = gateway
        .login(email, password)
        .await
        .inspect_err(|e| log::warn!("Login failed: {}", e))?;
    session.login(response.user, response.token)?;
    Ok(())
}
