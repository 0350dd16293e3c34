use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::CourseId;

/// Watch progress for one course, keyed by `course_id` within a log.
///
/// Serialized into the stored documents with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub course_id: CourseId,
    pub played_fraction: f64,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
}

/// Ordered collection of progress records, unique by course id.
///
/// Insertion order is irrelevant; lookup is by key. Records are created on
/// first upsert for a course, mutated in place afterwards, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressLog {
    records: Vec<ProgressRecord>,
}

impl ProgressLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn get(&self, course_id: CourseId) -> Option<&ProgressRecord> {
        self.records
            .iter()
            .find(|record| record.course_id == course_id)
    }

    /// Update the record for `course_id`, or append one if absent.
    ///
    /// Stamps `last_watched = now`. Completion is monotonic: once a record is
    /// completed, a later lower-fraction write never resets it.
    pub fn upsert(
        &mut self,
        course_id: CourseId,
        played_fraction: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) {
        match self
            .records
            .iter_mut()
            .find(|record| record.course_id == course_id)
        {
            Some(record) => {
                record.played_fraction = played_fraction;
                record.completed = completed || record.completed;
                record.last_watched = now;
            }
            None => self.records.push(ProgressRecord {
                course_id,
                played_fraction,
                completed,
                last_watched: now,
            }),
        }
    }

    /// Course ids ordered by `last_watched` descending, first `limit`.
    ///
    /// Ties keep insertion order (stable sort).
    #[must_use]
    pub fn recent_course_ids(&self, limit: usize) -> Vec<CourseId> {
        let mut sorted: Vec<&ProgressRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
        sorted
            .into_iter()
            .take(limit)
            .map(|record| record.course_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn upsert_then_get_returns_supplied_fraction() {
        let mut log = ProgressLog::new();
        log.upsert(CourseId::new(3), 0.4, false, fixed_now());

        let record = log.get(CourseId::new(3)).unwrap();
        assert_eq!(record.course_id, CourseId::new(3));
        assert!((record.played_fraction - 0.4).abs() < f64::EPSILON);
        assert!(!record.completed);
        assert_eq!(record.last_watched, fixed_now());
    }

    #[test]
    fn upsert_updates_in_place_without_duplicates() {
        let mut log = ProgressLog::new();
        let now = fixed_now();
        log.upsert(CourseId::new(1), 0.2, false, now);
        log.upsert(CourseId::new(1), 0.6, false, now + Duration::minutes(1));

        assert_eq!(log.len(), 1);
        let record = log.get(CourseId::new(1)).unwrap();
        assert!((record.played_fraction - 0.6).abs() < f64::EPSILON);
        assert_eq!(record.last_watched, now + Duration::minutes(1));
    }

    #[test]
    fn completion_is_monotonic() {
        let mut log = ProgressLog::new();
        let now = fixed_now();
        log.upsert(CourseId::new(1), 0.97, true, now);
        log.upsert(CourseId::new(1), 0.1, false, now + Duration::minutes(5));

        let record = log.get(CourseId::new(1)).unwrap();
        assert!(record.completed);
        assert!((record.played_fraction - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn identical_upserts_differ_only_in_timestamp() {
        let mut a = ProgressLog::new();
        let mut b = ProgressLog::new();
        let now = fixed_now();
        a.upsert(CourseId::new(1), 0.5, false, now);
        b.upsert(CourseId::new(1), 0.5, false, now);
        b.upsert(CourseId::new(1), 0.5, false, now + Duration::seconds(30));

        let left = a.get(CourseId::new(1)).unwrap();
        let right = b.get(CourseId::new(1)).unwrap();
        assert_eq!(left.played_fraction, right.played_fraction);
        assert_eq!(left.completed, right.completed);
        assert_ne!(left.last_watched, right.last_watched);
    }

    #[test]
    fn recent_orders_by_last_watched_descending() {
        let mut log = ProgressLog::new();
        let now = fixed_now();
        log.upsert(CourseId::new(1), 0.1, false, now);
        log.upsert(CourseId::new(2), 0.2, false, now + Duration::hours(2));
        log.upsert(CourseId::new(3), 0.3, false, now + Duration::hours(1));

        assert_eq!(
            log.recent_course_ids(2),
            vec![CourseId::new(2), CourseId::new(3)]
        );
    }

    #[test]
    fn round_trips_camel_case_json() {
        let mut log = ProgressLog::new();
        log.upsert(CourseId::new(9), 0.25, false, fixed_now());

        let raw = serde_json::to_string(&log).unwrap();
        assert!(raw.contains("\"courseId\":9"));
        assert!(raw.contains("\"playedFraction\":0.25"));
        assert!(raw.contains("\"lastWatched\""));

        let parsed: ProgressLog = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, log);
    }
}
