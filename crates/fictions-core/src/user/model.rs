//! UserProfile domain model.

use serde::{Deserialize, Serialize};

/// Profile of the logged-in user, cached next to the bearer token.
///
/// Replaced wholesale on every login/register and never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier, matched against `FictionRecord::created_by`
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    pub email: String,
    /// Registration time as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Name shown in greetings: the username, or the email when it is blank.
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}
