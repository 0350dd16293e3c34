use storage::documents::SessionStore;

use watch_core::model::{SessionState, UserId};

// The dashboard ships with exactly one hardcoded credential pair.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "password123";

/// Login/logout over the stored session document.
#[derive(Clone)]
pub struct AuthService {
    sessions: SessionStore,
}

impl AuthService {
    #[must_use]
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Compare against the fixed credential pair.
    ///
    /// On a match, writes a fresh authenticated session with empty progress
    /// and returns `true`; logging in again therefore resets any progress
    /// stored under the session document. On a mismatch, returns `false` and
    /// leaves the stored state untouched.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            return false;
        }
        let state = SessionState::signed_in(UserId::new(1), ADMIN_USERNAME);
        self.sessions.write(&state).await;
        true
    }

    /// Write the default unauthenticated state.
    ///
    /// The `users` document is retained but orphaned from the session view
    /// until the next login.
    pub async fn logout(&self) {
        self.sessions.write(&SessionState::logged_out()).await;
    }

    /// The current stored session, failing open to logged out.
    pub async fn current(&self) -> SessionState {
        self.sessions.read().await
    }
}
