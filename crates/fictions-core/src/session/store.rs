//! Session store.
//!
//! Persists the bearer token and the cached user profile as two entries of a
//! [`KeyValueStore`], cleared together on logout.

use super::model::Session;
use super::storage::KeyValueStore;
use crate::error::{FictionsError, Result};
use crate::user::UserProfile;
use std::sync::Arc;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Owner of the persisted session.
///
/// Constructed once at start-up and shared (`Arc<SessionStore>`) with the HTTP
/// client, which only reads the token, and the auth service, which is the only
/// writer.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persists both entries, token first, in one storage update.
    ///
    /// If the storage gives up part way through, the previous entries are
    /// put back so token and profile always belong to the same login.
    pub fn save(&self, token: &str, user: &UserProfile) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        let previous_token = self.storage.get(TOKEN_KEY)?;
        let previous_user = self.storage.get(USER_KEY)?;

        if let Err(e) = self
            .storage
            .set_many(&[(TOKEN_KEY, token), (USER_KEY, user_json.as_str())])
        {
            let rollback = self
                .restore(TOKEN_KEY, previous_token)
                .and(self.restore(USER_KEY, previous_user));
            if let Err(rollback) = rollback {
                tracing::error!("Failed to restore previous session: {}", rollback);
                return Err(FictionsError::storage(format!(
                    "{}; restoring the previous session also failed: {}",
                    e, rollback
                )));
            }
            return Err(e);
        }
        tracing::debug!(user_id = %user.id, "Session saved");
        Ok(())
    }

    /// Removes both entries in one storage update.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_many(&[TOKEN_KEY, USER_KEY])
    }

    /// Puts `key` back to `previous`, touching it only if it changed.
    fn restore(&self, key: &str, previous: Option<String>) -> Result<()> {
        if self.storage.get(key)? == previous {
            return Ok(());
        }
        match previous {
            Some(value) => self.storage.set(key, &value),
            None => self.storage.remove(key),
        }
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Cached user profile, if any.
    ///
    /// Malformed persisted data reads as "no user" instead of failing.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read cached user: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring malformed cached user: {}", e);
                None
            }
        }
    }

    /// True iff a token is present. Says nothing about its validity.
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.token().map(|token| Session {
            token,
            user: self.user(),
        })
    }
}
