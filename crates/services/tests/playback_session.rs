use std::sync::{Arc, Mutex};
use std::time::Duration;

use services::{
    AuthService, PlaybackSession, PlaybackState, PlaybackTiming, PlayerWidget, ProgressService,
};
use storage::documents::{SessionStore, UserDirectory};
use storage::repository::Storage;
use watch_core::model::{Catalog, Course, CourseId};
use watch_core::time::fixed_clock;

struct FakeWidget {
    position: Mutex<f64>,
    duration: Mutex<f64>,
    seeks: Mutex<Vec<f64>>,
}

impl FakeWidget {
    fn new(duration: f64) -> Self {
        Self {
            position: Mutex::new(0.0),
            duration: Mutex::new(duration),
            seeks: Mutex::new(Vec::new()),
        }
    }

    fn set_position(&self, seconds: f64) {
        *self.position.lock().unwrap() = seconds;
    }

    fn set_duration(&self, seconds: f64) {
        *self.duration.lock().unwrap() = seconds;
    }

    fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().unwrap().clone()
    }
}

impl PlayerWidget for FakeWidget {
    fn current_time(&self) -> f64 {
        *self.position.lock().unwrap()
    }

    fn duration(&self) -> f64 {
        *self.duration.lock().unwrap()
    }

    fn seek_to(&self, seconds: f64) {
        self.seeks.lock().unwrap().push(seconds);
        self.set_position(seconds);
    }
}

async fn progress_service() -> Arc<ProgressService> {
    let storage = Storage::in_memory();
    let sessions = SessionStore::new(Arc::clone(&storage.documents));
    let users = UserDirectory::new(Arc::clone(&storage.documents));
    let catalog = Arc::new(Catalog::new(vec![
        Course::new(CourseId::new(1), "Algebra", "https://example.com/1.mp4").unwrap(),
    ]));

    let auth = AuthService::new(sessions.clone());
    assert!(auth.login("admin", "password123").await);

    Arc::new(ProgressService::new(fixed_clock(), sessions, users, catalog))
}

#[tokio::test(start_paused = true)]
async fn resume_seek_fires_once_despite_repeated_ready() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(100.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        progress,
        0.5,
    );

    session.on_ready().await;
    session.on_ready().await;
    tokio::time::sleep(Duration::from_millis(700)).await;

    assert_eq!(widget.seeks(), vec![50.0]);
    assert_eq!(session.state().await, PlaybackState::Ready);
}

#[tokio::test(start_paused = true)]
async fn resume_seek_waits_for_a_known_duration() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(0.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        progress,
        0.25,
    );

    session.on_ready().await;
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(widget.seeks().is_empty());

    widget.set_duration(200.0);
    session.on_duration(200.0).await;
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(widget.seeks(), vec![50.0]);
}

#[tokio::test(start_paused = true)]
async fn sampling_flushes_after_the_debounce() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(100.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.0,
    );

    session.on_ready().await;
    session.on_play().await;
    widget.set_position(30.0);

    // Sample at 20s, debounce expires at 25s.
    tokio::time::sleep(Duration::from_secs(24)).await;
    assert!(progress.progress_for(CourseId::new(1)).await.is_none());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let record = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((record.played_fraction - 0.3).abs() < 1e-9);
    assert!(!record.completed);
}

#[tokio::test(start_paused = true)]
async fn rapid_samples_collapse_into_one_deferred_flush() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(100.0));
    let session = PlaybackSession::with_timing(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.0,
        PlaybackTiming {
            settle: Duration::from_millis(500),
            sample_every: Duration::from_secs(1),
            debounce: Duration::from_secs(5),
        },
    );

    session.on_ready().await;
    session.on_play().await;
    widget.set_position(10.0);

    // Every second a new sample re-arms the debounce, so no flush lands
    // while playback continues.
    tokio::time::sleep(Duration::from_secs(12)).await;
    assert!(progress.progress_for(CourseId::new(1)).await.is_none());

    session.on_pause().await;
    assert!(progress.progress_for(CourseId::new(1)).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn pause_and_ended_flush_immediately() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(50.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.0,
    );

    session.on_ready().await;
    session.on_play().await;

    widget.set_position(47.0);
    session.on_pause().await;
    let record = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((record.played_fraction - 0.94).abs() < 1e-9);
    assert!(!record.completed);
    assert_eq!(session.state().await, PlaybackState::Paused);

    session.on_play().await;
    widget.set_position(48.0);
    session.on_ended().await;
    let record = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((record.played_fraction - 0.96).abs() < 1e-9);
    assert!(record.completed);
    assert_eq!(session.state().await, PlaybackState::Ended);
}

#[tokio::test(start_paused = true)]
async fn teardown_flushes_raw_seconds_when_duration_is_unknown() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(0.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.0,
    );

    session.on_ready().await;
    widget.set_position(10.0);
    session.teardown().await;

    let record = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((record.played_fraction - 10.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_every_outstanding_timer() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(100.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.5,
    );

    session.on_ready().await;
    session.on_play().await;
    widget.set_position(10.0);
    session.teardown().await;

    let flushed = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((flushed.played_fraction - 0.1).abs() < 1e-9);

    // No resume seek, sample, or debounce may land after teardown.
    widget.set_position(90.0);
    session.on_play().await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(widget.seeks().is_empty());
    let record = progress.progress_for(CourseId::new(1)).await.unwrap();
    assert!((record.played_fraction - 0.1).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn teardown_without_progress_skips_the_flush() {
    let progress = progress_service().await;
    let widget = Arc::new(FakeWidget::new(100.0));
    let session = PlaybackSession::new(
        CourseId::new(1),
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        0.0,
    );

    session.on_ready().await;
    session.teardown().await;

    assert!(progress.progress_for(CourseId::new(1)).await.is_none());
}
