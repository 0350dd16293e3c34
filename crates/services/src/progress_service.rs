use std::sync::Arc;

use storage::documents::{SessionStore, UserDirectory};
use tokio::sync::broadcast;

use watch_core::Clock;
use watch_core::model::{Catalog, Course, CourseId, ProgressRecord};

use crate::events::{ProgressChanged, ProgressEvents};

/// A course counts as completed once this fraction has been watched.
pub const COMPLETION_THRESHOLD: f64 = 0.95;

/// How many recently watched courses the dashboard shows.
pub const DEFAULT_RECENT_LIMIT: usize = 4;

/// Tracks watch progress: upserts into the session document, mirrors the
/// write into the users document, and broadcasts a change event.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    sessions: SessionStore,
    users: UserDirectory,
    catalog: Arc<Catalog>,
    events: ProgressEvents,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: SessionStore,
        users: UserDirectory,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            clock,
            sessions,
            users,
            catalog,
            events: ProgressEvents::default(),
        }
    }

    /// Subscribe to progress change broadcasts.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressChanged> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Upsert progress for the current session's user.
    ///
    /// `completed` defaults to `played_fraction >= 0.95` when not supplied.
    /// Fractions are stored as given; callers clamp to `[0, 1]`. A no-op when
    /// the session is unauthenticated. Both stored documents receive the
    /// write with monotonic completion, then a change event is broadcast.
    pub async fn save_progress(
        &self,
        course_id: CourseId,
        played_fraction: f64,
        completed: Option<bool>,
    ) {
        let completed = completed.unwrap_or(played_fraction >= COMPLETION_THRESHOLD);
        let now = self.clock.now();

        let mut session = self.sessions.read().await;
        if !session.record_progress(course_id, played_fraction, completed, now) {
            return;
        }
        self.sessions.write(&session).await;

        if let Some(user) = session.user.as_ref() {
            self.users
                .update_progress(user.user_id, course_id, played_fraction, completed, now)
                .await;
        }

        self.events.publish(ProgressChanged {
            course_id,
            played_fraction,
            completed,
        });
    }

    /// The stored record for one course in the current session.
    pub async fn progress_for(&self, course_id: CourseId) -> Option<ProgressRecord> {
        self.sessions.read().await.progress_for(course_id).cloned()
    }

    /// Recently watched courses, most recent first.
    ///
    /// At most `limit` entries; ids that no longer resolve in the catalog are
    /// dropped.
    pub async fn recent_courses(&self, limit: usize) -> Vec<Course> {
        let session = self.sessions.read().await;
        let Some(user) = session.user else {
            return Vec::new();
        };
        user.progress
            .recent_course_ids(limit)
            .into_iter()
            .filter_map(|id| self.catalog.get(id).cloned())
            .collect()
    }
}
