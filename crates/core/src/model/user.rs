use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CourseId, ProgressLog, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// One entry in the `users` document.
///
/// Passwords are stored in plaintext; there is no server-side identity
/// behind this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub progress: ProgressLog,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Upsert watch progress for one course, with monotonic completion.
    pub fn update_progress(
        &mut self,
        course_id: CourseId,
        played_fraction: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) {
        self.progress
            .upsert(course_id, played_fraction, completed, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn account() -> UserAccount {
        UserAccount {
            id: UserId::new(1),
            username: "admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "password123".to_owned(),
            first_name: None,
            last_name: None,
            progress: ProgressLog::new(),
            role: UserRole::Admin,
            created_at: fixed_now(),
        }
    }

    #[test]
    fn role_uses_lowercase_wire_names() {
        let raw = serde_json::to_string(&account()).unwrap();
        assert!(raw.contains("\"role\":\"admin\""));
        assert!(raw.contains("\"createdAt\""));
    }

    #[test]
    fn progress_updates_are_monotonic_on_the_account() {
        let mut account = account();
        account.update_progress(CourseId::new(2), 0.96, true, fixed_now());
        account.update_progress(CourseId::new(2), 0.3, false, fixed_now());
        assert!(account.progress.get(CourseId::new(2)).unwrap().completed);
    }
}
