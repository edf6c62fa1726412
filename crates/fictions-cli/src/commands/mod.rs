pub mod auth;
pub mod fictions;
pub mod render;

use fictions_application::FictionsUseCase;
use fictions_core::session::{Admission, View};

/// Marks a failure that has already been printed to the user.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "command failed")
    }
}

impl std::error::Error for Reported {}

/// Runs the access guard for the fictions view.
///
/// Returns `Err(Reported)` after printing the login hint when the session has no token.
pub fn require_fictions_view(app: &FictionsUseCase) -> anyhow::Result<()> {
    match app.enter(View::Fictions) {
        Admission::Admit => Ok(()),
        Admission::Redirect(view) => {
            render::redirect_hint(view);
            Err(Reported.into())
        }
    }
}
