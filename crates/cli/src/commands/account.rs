//! Session commands.

use sabriaz_storefront::state::{AppState, LOGIN_FAILED, REGISTER_FAILED};

use super::{CommandFailed, failed};

/// Sign in and persist the session.
#[allow(clippy::print_stdout)]
pub async fn login(state: &mut AppState, email: &str, password: &str) -> Result<(), CommandFailed> {
    let user = state
        .login(email, password)
        .await
        .map_err(|e| failed(&e, LOGIN_FAILED))?;

    println!("Signed in as {} <{}>", user.name, user.email);
    if user.is_admin() {
        println!("Admin access enabled: try `sabriaz admin analytics`");
    }
    Ok(())
}

/// Create an account and sign in.
#[allow(clippy::print_stdout)]
pub async fn register(
    state: &mut AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), CommandFailed> {
    let user = state
        .register(name, email, password)
        .await
        .map_err(|e| failed(&e, REGISTER_FAILED))?;

    println!("Welcome, {}! You are signed in.", user.name);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(state: &mut AppState) {
    state.logout();
    println!("Signed out");
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.session().state().user() {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in (guest)"),
    }
}
