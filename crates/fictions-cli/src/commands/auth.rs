use super::{Reported, render};
use anyhow::Result;
use fictions_application::FictionsUseCase;
use fictions_core::session::{Admission, View};

/// Anonymous entry check shared by login and register.
fn already_logged_in(app: &FictionsUseCase) -> bool {
    match app.enter(View::Login) {
        Admission::Redirect(view) => {
            render::navbar(app.current_user().as_ref());
            render::redirect_hint(view);
            true
        }
        Admission::Admit => false,
    }
}

pub async fn login(app: &FictionsUseCase, email: &str, password: &str) -> Result<()> {
    if already_logged_in(app) {
        return Ok(());
    }

    match app.login(email, password).await {
        Ok(user) => {
            render::navbar(Some(&user));
            render::success("Logged in");
            Ok(())
        }
        Err(e) => {
            render::inline_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn register(
    app: &FictionsUseCase,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    if already_logged_in(app) {
        return Ok(());
    }

    match app.register(username, email, password).await {
        Ok(user) => {
            render::navbar(Some(&user));
            render::success("Account created");
            Ok(())
        }
        Err(e) => {
            render::inline_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn logout(app: &FictionsUseCase) -> Result<()> {
    app.logout().await;
    render::success("Logged out");
    Ok(())
}

pub fn whoami(app: &FictionsUseCase) -> Result<()> {
    if !app.auth().is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    let user = app.current_user();
    render::navbar(user.as_ref());
    if let Some(user) = user {
        println!("  {} <{}>", user.username, user.email);
    }
    Ok(())
}
