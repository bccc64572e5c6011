//! Session commands: login, logout, whoami, register, refresh.

#![allow(clippy::print_stdout)]

use shopsync_client::StoreError;

use super::App;

/// Exchange credentials and persist the session.
///
/// # Errors
///
/// Returns the store error if the exchange or persistence fails.
pub async fn login(app: &App, email: &str, password: &str) -> Result<(), StoreError> {
    app.session.login(email, password).await?;
    match app.session.current_user() {
        Some(user) => println!("Logged in as {} <{}>", user.name, user.email),
        None => println!("Logged in"),
    }
    Ok(())
}

/// Clear the persisted session. Safe when already logged out.
pub fn logout(app: &App) {
    app.session.logout();
    println!("Logged out");
}

/// Print the cached user snapshot, if any.
pub fn whoami(app: &App) {
    match app.session.current_user() {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            if let Some(role) = user.role {
                println!("role: {role}");
            }
        }
        None if app.session.is_authenticated() => {
            println!("Logged in (no cached profile)");
        }
        None => println!("Not logged in"),
    }
}

/// Create an account without logging in.
///
/// # Errors
///
/// Returns the store error if the remote create or snapshot persistence
/// fails.
pub async fn register(
    app: &App,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), StoreError> {
    let user = app.session.register(name, email, password).await?;
    println!("Created account {} <{}>", user.name, user.email);
    Ok(())
}

/// Rotate the stored token pair.
///
/// # Errors
///
/// Returns the store error if no refresh token is stored or the exchange
/// fails.
pub async fn refresh(app: &App) -> Result<(), StoreError> {
    app.session.refresh_token().await?;
    println!("Token pair refreshed");
    Ok(())
}
