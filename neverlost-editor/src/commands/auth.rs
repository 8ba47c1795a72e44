use anyhow::{anyhow, Result};
use neverlost_core::auth::{self, RegisterForm};
use neverlost_core::error::{LOGIN_FAILED, REGISTER_FAILED};
use neverlost_core::gateway::LayoutGateway;
use neverlost_core::session::SessionContext;

pub async fn register(
    gateway: &impl LayoutGateway,
    session: &mut SessionContext,
    username: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<()> {
    let form = RegisterForm {
        username,
        email,
        password,
        confirm_password,
    };
    auth::register(gateway, session, &form)
        .await
        .map_err(|e| anyhow!(e.user_message(REGISTER_FAILED)))?;
    println!("Registered and logged in as {}", form.username);
    Ok(())
}

pub async fn login(
    gateway: &impl LayoutGateway,
    session: &mut SessionContext,
    email: &str,
    password: &str,
) -> Result<()> {
    auth::login(gateway, session, email, password)
        .await
        .map_err(|e| anyhow!(e.user_message(LOGIN_FAILED)))?;
    if let Some(user) = session.user() {
        println!("Logged in as {}", user.display_name());
    }
    Ok(())
}

pub fn logout(session: &mut SessionContext) -> Result<()> {
    session.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(session: &SessionContext) -> Result<()> {
    match session.user() {
        Some(user) => println!("{} <{}>", user.display_name(), user.email),
        None if session.is_authenticated() => println!("Logged in (no user details stored)"),
        None => println!("Not logged in"),
    }
    Ok(())
}
