use crate::error::{FictionsError, Result};
use crate::user::UserProfile;
use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 100;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(FictionsError::validation("Password is required"));
        }
        Ok(())
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let name_len = self.username.chars().count();
        if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&name_len) {
            return Err(FictionsError::validation(format!(
                "Username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            )));
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(FictionsError::validation("Username must be alphanumeric"));
        }
        validate_email(&self.email)?;
        let pw_len = self.password.chars().count();
        if pw_len < PASSWORD_MIN_CHARS {
            return Err(FictionsError::validation(format!(
                "Password must be at least {PASSWORD_MIN_CHARS} characters"
            )));
        }
        if pw_len > PASSWORD_MAX_CHARS {
            return Err(FictionsError::validation(format!(
                "Password must be at most {PASSWORD_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }
}

// Passwords stay out of logs and panic messages.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful response of both authentication endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub user: UserProfile,
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FictionsError::validation("Email is required"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(FictionsError::validation("Enter a valid email address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_minimum_boundary() {
        assert!(RegisterRequest::new("alice", "a@b.com", "12345").validate().is_err());
        assert!(RegisterRequest::new("alice", "a@b.com", "123456").validate().is_ok());
    }

    #[test]
    fn test_password_maximum_boundary() {
        let long = "p".repeat(PASSWORD_MAX_CHARS + 1);
        assert!(RegisterRequest::new("alice", "a@b.com", long).validate().is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(RegisterRequest::new("al", "a@b.com", "secret1").validate().is_err());
        assert!(RegisterRequest::new("al_ice-1", "a@b.com", "secret1").validate().is_ok());
        assert!(RegisterRequest::new("al ice", "a@b.com", "secret1").validate().is_err());
        let long = "a".repeat(USERNAME_MAX_CHARS + 1);
        assert!(RegisterRequest::new(long, "a@b.com", "secret1").validate().is_err());
    }

    #[test]
    fn test_login_requires_email_and_password() {
        assert!(LoginRequest::new("a@b.com", "secret1").validate().is_ok());
        assert!(LoginRequest::new("", "secret1").validate().is_err());
        assert!(LoginRequest::new("ab.com", "secret1").validate().is_err());
        assert!(LoginRequest::new("a@b.com", "").validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let dbg = format!("{:?}", LoginRequest::new("a@b.com", "hunter22"));
        assert!(!dbg.contains("hunter22"));
    }

    #[test]
    fn test_auth_response_parses_token_payload() {
        let json = r#"{"token":"t0k","token_type":"bearer",
            "user":{"_id":"u1","username":"alice","email":"a@b.com"}}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "t0k");
        assert_eq!(resp.user.id, "u1");
    }
}
