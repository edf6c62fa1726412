//! Ownership policy.
//!
//! Decides which action controls to offer. The backend remains the only
//! authorization boundary; this never blocks a request by itself.

use super::model::FictionRecord;
use crate::user::UserProfile;

/// Returns true iff `user` is present and created `record`.
pub fn is_owner(record: &FictionRecord, user: Option<&UserProfile>) -> bool {
    user.is_some_and(|u| record.created_by == u.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiction::Genre;

    fn record(created_by: &str) -> FictionRecord {
        FictionRecord {
            id: "f1".into(),
            title: "T".into(),
            author: "A".into(),
            genre: Genre::Fantasy,
            description: "D".into(),
            content: "C".into(),
            created_by: created_by.into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.into(),
            username: "alice".into(),
            email: "a@b.com".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_owner_matches_created_by() {
        assert!(is_owner(&record("u1"), Some(&user("u1"))));
        assert!(!is_owner(&record("u1"), Some(&user("u2"))));
    }

    #[test]
    fn test_absent_user_owns_nothing() {
        assert!(!is_owner(&record("u1"), None));
        assert!(!is_owner(&record(""), None));
    }
}
