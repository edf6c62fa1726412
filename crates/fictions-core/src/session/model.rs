use crate::user::UserProfile;

/// The client's record of being logged in.
///
/// Holding a token is what "authenticated" means on this side; whether the
/// backend still accepts it is only known on the next protected call.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}
