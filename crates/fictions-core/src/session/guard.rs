//! Access guard.

use super::store::SessionStore;
use std::sync::Arc;

/// Views a presentation layer can enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Anonymous entry view (login/register form)
    Login,
    /// Protected list of fictions
    Fictions,
}

impl View {
    pub fn is_protected(self) -> bool {
        matches!(self, View::Fictions)
    }
}

/// Outcome of an entry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Redirect(View),
}

/// Decides whether a view may be entered with the current session.
///
/// Nothing is cached: every call looks at the store again, so clearing the
/// session blocks the very next entry.
#[derive(Clone)]
pub struct AccessGuard {
    session_store: Arc<SessionStore>,
}

impl AccessGuard {
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self { session_store }
    }

    pub fn check(&self, view: View) -> Admission {
        let authenticated = self.session_store.has_token();
        match (view.is_protected(), authenticated) {
            (true, true) => Admission::Admit,
            (true, false) => Admission::Redirect(View::Login),
            // An existing session skips the login form.
            (false, true) => Admission::Redirect(View::Fictions),
            (false, false) => Admission::Admit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::tests::{MapStorage, alice};

    #[test]
    fn test_guard_follows_session_changes() {
        let store = Arc::new(SessionStore::new(Arc::new(MapStorage::default())));
        let guard = AccessGuard::new(store.clone());

        assert_eq!(guard.check(View::Fictions), Admission::Redirect(View::Login));
        assert_eq!(guard.check(View::Login), Admission::Admit);

        store.save("t0k", &alice()).unwrap();
        assert_eq!(guard.check(View::Fictions), Admission::Admit);
        assert_eq!(guard.check(View::Login), Admission::Redirect(View::Fictions));

        store.clear().unwrap();
        assert_eq!(guard.check(View::Fictions), Admission::Redirect(View::Login));
    }
}
