//! Auth Service
//!
//! Login, registration and logout. A successful login or registration stores
//! the returned token and profile; a failed one leaves the session untouched.

use fictions_core::Result;
use fictions_core::auth::{AuthResponse, LoginRequest, RegisterRequest};
use fictions_core::session::SessionStore;
use fictions_core::user::UserProfile;
use fictions_interaction::ApiClient;
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Service owning the session lifecycle
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session_store: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, session_store: Arc<SessionStore>) -> Self {
        Self { api, session_store }
    }

    /// Logs in and persists the session.
    ///
    /// # Errors
    ///
    /// - `Validation` when the email or password is unusable (no request is sent)
    /// - `Request` when the backend rejects the credentials
    /// - `Storage` when the session cannot be persisted
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let request = LoginRequest::new(email.trim(), password);
        request.validate()?;

        let response: AuthResponse = self.api.post(LOGIN_PATH, &request).await?;
        self.establish(response)
    }

    /// Creates an account and logs in with it.
    ///
    /// Input is validated first; a rejected password never reaches the network.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let request = RegisterRequest::new(username.trim(), email.trim(), password);
        request.validate()?;

        let response: AuthResponse = self.api.post(REGISTER_PATH, &request).await?;
        self.establish(response)
    }

    /// Forgets the session. Storage failures are logged, never returned.
    pub fn logout(&self) {
        if let Err(e) = self.session_store.clear() {
            tracing::warn!("Failed to clear session during logout: {}", e);
        }
        tracing::info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_store.has_token()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session_store.user()
    }

    fn establish(&self, response: AuthResponse) -> Result<UserProfile> {
        self.session_store.save(&response.token, &response.user)?;
        tracing::info!(
            user_id = %response.user.id,
            "Session established for {}",
            response.user.username
        );
        Ok(response.user)
    }
}
