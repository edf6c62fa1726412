//! Fictions use case.
//!
//! `FictionsUseCase` is the command surface a presentation layer drives. It
//! wires the shared `SessionStore` into the HTTP client and both services,
//! keeps the most recently loaded listing in memory, and reacts to 401
//! responses from protected calls according to `UnauthorizedPolicy`.

use crate::auth_service::AuthService;
use crate::fiction_service::FictionService;
use fictions_core::Result;
use fictions_core::config::{ClientConfig, UnauthorizedPolicy};
use fictions_core::fiction::{DeleteConfirmation, FictionDraft, FictionRecord, is_owner};
use fictions_core::session::{AccessGuard, Admission, SessionStore, View};
use fictions_core::user::UserProfile;
use fictions_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Commands for the login form and the fictions page.
///
/// # Responsibilities
///
/// - Session transitions (login, register, logout)
/// - Entry checks through the `AccessGuard`
/// - CRUD on fictions, reloading the listing after every successful change
/// - Ownership decisions for edit/delete affordances
pub struct FictionsUseCase {
    auth: AuthService,
    fictions: FictionService,
    guard: AccessGuard,
    session_store: Arc<SessionStore>,
    on_unauthorized: UnauthorizedPolicy,
    /// Last successfully loaded listing
    listing: RwLock<Vec<FictionRecord>>,
}

impl FictionsUseCase {
    /// Builds the HTTP client and services around one session store.
    pub fn new(config: &ClientConfig, session_store: Arc<SessionStore>) -> Result<Self> {
        let api = ApiClient::new(config, session_store.clone())?;
        Ok(Self {
            auth: AuthService::new(api.clone(), session_store.clone()),
            fictions: FictionService::new(api),
            guard: AccessGuard::new(session_store.clone()),
            session_store,
            on_unauthorized: config.on_unauthorized,
            listing: RwLock::new(Vec::new()),
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn on_unauthorized(&self) -> UnauthorizedPolicy {
        self.on_unauthorized
    }

    /// Entry check for a view, evaluated against the session as it is now.
    pub fn enter(&self, view: View) -> Admission {
        self.guard.check(view)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        self.auth.login(email, password).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        self.auth.register(username, email, password).await
    }

    /// Clears the session and drops the cached listing.
    pub async fn logout(&self) {
        self.auth.logout();
        self.listing.write().await.clear();
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.auth.current_user()
    }

    /// Loads the listing from the backend and caches it.
    ///
    /// On failure the previous listing is kept and the error is returned.
    pub async fn load_fictions(&self) -> Result<Vec<FictionRecord>> {
        let records = self.protected(self.fictions.list().await)?;
        *self.listing.write().await = records.clone();
        Ok(records)
    }

    /// The listing as of the last successful load.
    pub async fn listing(&self) -> Vec<FictionRecord> {
        self.listing.read().await.clone()
    }

    pub async fn show(&self, id: &str) -> Result<FictionRecord> {
        self.protected(self.fictions.get(id).await)
    }

    pub async fn create(&self, draft: &FictionDraft) -> Result<FictionRecord> {
        let record = self.protected(self.fictions.create(draft).await)?;
        self.reload_after_change().await;
        Ok(record)
    }

    pub async fn update(&self, id: &str, draft: &FictionDraft) -> Result<FictionRecord> {
        let record = self.protected(self.fictions.update(id, draft).await)?;
        self.reload_after_change().await;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteConfirmation> {
        let confirmation = self.protected(self.fictions.delete(id).await)?;
        self.reload_after_change().await;
        Ok(confirmation)
    }

    /// Whether the current user may be offered edit and delete on `record`.
    pub fn is_owner(&self, record: &FictionRecord) -> bool {
        is_owner(record, self.auth.current_user().as_ref())
    }

    /// Applies the unauthorized policy to the outcome of a protected call.
    fn protected<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() && self.session_store.has_token() {
                match self.on_unauthorized {
                    UnauthorizedPolicy::Surface => {
                        tracing::warn!("Backend rejected the stored token; keeping session");
                    }
                    UnauthorizedPolicy::ClearSession => {
                        tracing::warn!("Backend rejected the stored token; clearing session");
                        self.auth.logout();
                    }
                }
            }
        }
        result
    }

    // A failed reload does not undo a successful change.
    async fn reload_after_change(&self) {
        if let Err(e) = self.load_fictions().await {
            tracing::warn!("Failed to reload fictions after change: {}", e);
        }
    }
}
