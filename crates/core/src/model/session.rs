use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CourseId, ProgressLog, ProgressRecord, UserId};

/// The identity half of a session, persisted under the `authState` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub progress: ProgressLog,
}

/// The current auth/session state as stored: either logged out, or an
/// authenticated user with their cached progress.
///
/// The UI layer only ever holds a read copy of this; any copy is stale after
/// the next write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(rename = "isAuthenticated")]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserData>,
}

impl SessionState {
    /// The default unauthenticated state.
    #[must_use]
    pub fn logged_out() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    /// A freshly authenticated session with empty progress.
    #[must_use]
    pub fn signed_in(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            user: Some(UserData {
                user_id,
                username: username.into(),
                progress: ProgressLog::new(),
            }),
        }
    }

    /// Upsert progress for the current user.
    ///
    /// Returns `false` without touching anything when the session is not
    /// authenticated.
    pub fn record_progress(
        &mut self,
        course_id: CourseId,
        played_fraction: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.authenticated {
            return false;
        }
        let Some(user) = self.user.as_mut() else {
            return false;
        };
        user.progress
            .upsert(course_id, played_fraction, completed, now);
        true
    }

    #[must_use]
    pub fn progress_for(&self, course_id: CourseId) -> Option<&ProgressRecord> {
        self.user.as_ref()?.progress.get(course_id)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::logged_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn record_progress_is_a_noop_when_logged_out() {
        let mut state = SessionState::logged_out();
        assert!(!state.record_progress(CourseId::new(1), 0.5, false, fixed_now()));
        assert_eq!(state, SessionState::logged_out());
    }

    #[test]
    fn record_progress_updates_authenticated_user() {
        let mut state = SessionState::signed_in(UserId::new(1), "admin");
        assert!(state.record_progress(CourseId::new(1), 0.5, false, fixed_now()));
        let record = state.progress_for(CourseId::new(1)).unwrap();
        assert!((record.played_fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_stored_document_keys() {
        let state = SessionState::signed_in(UserId::new(1), "admin");
        let raw = serde_json::to_string(&state).unwrap();
        assert!(raw.contains("\"isAuthenticated\":true"));
        assert!(raw.contains("\"userId\":1"));
        assert!(raw.contains("\"progress\":[]"));
    }

    #[test]
    fn logged_out_state_parses_from_minimal_document() {
        let state: SessionState = serde_json::from_str(r#"{"isAuthenticated":false}"#).unwrap();
        assert_eq!(state, SessionState::logged_out());
    }
}
