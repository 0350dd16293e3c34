//! Typed views over the two stored documents.
//!
//! Both wrappers share the same failure policy: a document that is missing,
//! unreadable, or not valid JSON reads as its default (logged-out session,
//! empty user list), and failed writes are logged and swallowed. The
//! worst-case outcome is stale or lost progress, never a crash.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use watch_core::model::{CourseId, SessionState, UserAccount, UserId};

use crate::repository::DocumentStore;

/// Key of the current auth/session document.
pub const AUTH_STATE_KEY: &str = "authState";

/// Key of the users collection document.
pub const USERS_KEY: &str = "users";

/// Reads and writes the `authState` document.
#[derive(Clone)]
pub struct SessionStore {
    documents: Arc<dyn DocumentStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Read the current session, failing open to the logged-out state.
    pub async fn read(&self) -> SessionState {
        match self.documents.get(AUTH_STATE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(%err, "stored auth state is not valid JSON, treating as logged out");
                    SessionState::logged_out()
                }
            },
            Ok(None) => SessionState::logged_out(),
            Err(err) => {
                warn!(%err, "could not read auth state, treating as logged out");
                SessionState::logged_out()
            }
        }
    }

    /// Serialize and store the complete session state.
    ///
    /// Write failures are logged and swallowed; callers must not assume the
    /// stored document is atomic across restarts.
    pub async fn write(&self, state: &SessionState) {
        let raw = match serde_json::to_string(state) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "could not serialize auth state");
                return;
            }
        };
        if let Err(err) = self.documents.put(AUTH_STATE_KEY, &raw).await {
            warn!(%err, "could not persist auth state");
        }
    }
}

/// Reads and writes the `users` collection document.
#[derive(Clone)]
pub struct UserDirectory {
    documents: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// All stored accounts, failing open to an empty list.
    pub async fn all(&self) -> Vec<UserAccount> {
        match self.documents.get(USERS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(err) => {
                    warn!(%err, "stored users document is not valid JSON, treating as empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read users document, treating as empty");
                Vec::new()
            }
        }
    }

    /// Look up one account by id.
    pub async fn get(&self, user_id: UserId) -> Option<UserAccount> {
        self.all().await.into_iter().find(|user| user.id == user_id)
    }

    /// Replace the whole users collection.
    ///
    /// Write failures are logged and swallowed.
    pub async fn save_all(&self, users: &[UserAccount]) {
        let raw = match serde_json::to_string(users) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "could not serialize users document");
                return;
            }
        };
        if let Err(err) = self.documents.put(USERS_KEY, &raw).await {
            warn!(%err, "could not persist users document");
        }
    }

    /// Upsert watch progress for one user's course and persist the document.
    ///
    /// Completion is monotonic on this path exactly as on the session path.
    /// Returns the updated account, or `None` when the user is missing.
    pub async fn update_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        played_fraction: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Option<UserAccount> {
        let mut users = self.all().await;
        let user = users.iter_mut().find(|user| user.id == user_id)?;
        user.update_progress(course_id, played_fraction, completed, now);
        let updated = user.clone();
        self.save_all(&users).await;
        Some(updated)
    }
}
