use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use watch_core::model::CourseId;

use crate::playback::controller::{PlaybackController, PlaybackState};
use crate::playback::timers::TaskHandle;
use crate::playback::widget::PlayerWidget;
use crate::progress_service::ProgressService;

/// Timer knobs for one playback session.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackTiming {
    /// Delay after readiness before the resume seek, so the widget accepts it.
    pub settle: Duration,
    /// How often playback position is sampled while playing.
    pub sample_every: Duration,
    /// How long a sampled flush is deferred; rapid samples collapse into one.
    pub debounce: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            sample_every: Duration::from_secs(20),
            debounce: Duration::from_secs(5),
        }
    }
}

/// Drives one embedded video widget through a watch session.
///
/// Forwards widget callbacks into the [`PlaybackController`], owns every
/// timer the session arms (settle, sampling interval, debounce), and flushes
/// progress through the [`ProgressService`] on debounce expiry, on pause, on
/// end, and once at teardown. Timer tasks hold only weak references, so
/// dropping the session silences them even without an explicit `teardown`.
pub struct PlaybackSession {
    weak: Weak<PlaybackSession>,
    course_id: CourseId,
    widget: Arc<dyn PlayerWidget>,
    progress: Arc<ProgressService>,
    timing: PlaybackTiming,
    controller: Mutex<PlaybackController>,
    settle: Mutex<Option<TaskHandle>>,
    sampler: Mutex<Option<TaskHandle>>,
    debounce: Mutex<Option<TaskHandle>>,
    torn_down: AtomicBool,
}

impl PlaybackSession {
    #[must_use]
    pub fn new(
        course_id: CourseId,
        widget: Arc<dyn PlayerWidget>,
        progress: Arc<ProgressService>,
        initial_fraction: f64,
    ) -> Arc<Self> {
        Self::with_timing(
            course_id,
            widget,
            progress,
            initial_fraction,
            PlaybackTiming::default(),
        )
    }

    #[must_use]
    pub fn with_timing(
        course_id: CourseId,
        widget: Arc<dyn PlayerWidget>,
        progress: Arc<ProgressService>,
        initial_fraction: f64,
        timing: PlaybackTiming,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            course_id,
            widget,
            progress,
            timing,
            controller: Mutex::new(PlaybackController::new(initial_fraction)),
            settle: Mutex::new(None),
            sampler: Mutex::new(None),
            debounce: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub async fn state(&self) -> PlaybackState {
        self.controller.lock().await.state()
    }

    /// Widget reported readiness. Reads the duration it knows so far and
    /// arms the settle-delayed resume seek.
    pub async fn on_ready(&self) {
        if self.is_torn_down() {
            return;
        }
        let duration = self.widget.duration();
        self.controller.lock().await.on_ready(duration);
        self.arm_resume_seek().await;
    }

    /// Widget reported an updated duration. May unblock a pending resume
    /// seek that was waiting on a known duration.
    pub async fn on_duration(&self, duration: f64) {
        if self.is_torn_down() {
            return;
        }
        self.controller.lock().await.on_duration(duration);
        self.arm_resume_seek().await;
    }

    /// Playback started or resumed: begin periodic position sampling.
    pub async fn on_play(&self) {
        if self.is_torn_down() {
            return;
        }
        self.controller.lock().await.on_play();

        let mut sampler = self.sampler.lock().await;
        if sampler.is_none() {
            let weak = self.weak.clone();
            let every = self.timing.sample_every;
            *sampler = Some(TaskHandle::spawn(async move {
                loop {
                    tokio::time::sleep(every).await;
                    let Some(session) = weak.upgrade() else { break };
                    session.sample().await;
                }
            }));
        }
    }

    /// Paused: stop sampling and flush immediately, bypassing the debounce.
    pub async fn on_pause(&self) {
        if self.is_torn_down() {
            return;
        }
        self.controller.lock().await.on_pause();
        self.sampler.lock().await.take();
        self.debounce.lock().await.take();
        self.flush().await;
    }

    /// Ended: stop sampling and flush immediately, bypassing the debounce.
    pub async fn on_ended(&self) {
        if self.is_torn_down() {
            return;
        }
        self.controller.lock().await.on_ended();
        self.sampler.lock().await.take();
        self.debounce.lock().await.take();
        self.flush().await;
    }

    /// Widget progress callback (fires about once per second while playing).
    pub async fn on_progress(&self, played_seconds: f64) {
        self.controller.lock().await.on_progress(played_seconds);
    }

    /// Widget decode/network errors are logged only; they do not change
    /// session state and do not disturb the timers.
    pub fn on_error(&self, message: &str) {
        warn!(course_id = %self.course_id, message, "video widget error");
    }

    /// Tear the session down: cancel every outstanding timer and, when there
    /// is actual progress, perform one final flush. Idempotent; nothing
    /// fires after this returns.
    pub async fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.settle.lock().await.take();
        self.sampler.lock().await.take();
        self.debounce.lock().await.take();

        let should_flush = {
            let mut controller = self.controller.lock().await;
            controller.on_progress(self.widget.current_time());
            controller.should_flush_on_teardown()
        };
        if should_flush {
            self.flush().await;
        }
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// (Re)arm the settle timer; the controller decides whether the seek
    /// actually fires, and it fires at most once per session.
    async fn arm_resume_seek(&self) {
        let weak = self.weak.clone();
        let settle = self.timing.settle;
        let handle = TaskHandle::spawn(async move {
            tokio::time::sleep(settle).await;
            let Some(session) = weak.upgrade() else {
                return;
            };
            let target = session.controller.lock().await.resume_seek_target();
            if let Some(seconds) = target {
                session.widget.seek_to(seconds);
            }
        });
        *self.settle.lock().await = Some(handle);
    }

    /// One sampling tick: read the widget position and (re)arm the debounce.
    async fn sample(&self) {
        let position = self.widget.current_time();
        self.controller.lock().await.on_progress(position);

        let weak = self.weak.clone();
        let debounce = self.timing.debounce;
        let handle = TaskHandle::spawn(async move {
            tokio::time::sleep(debounce).await;
            let Some(session) = weak.upgrade() else {
                return;
            };
            session.flush().await;
        });
        // Replacing the handle aborts the previous pending flush.
        *self.debounce.lock().await = Some(handle);
    }

    /// Write current progress through the progress tracker.
    ///
    /// Re-reads position and duration from the widget first, so the flush
    /// reflects the freshest values the widget will report.
    async fn flush(&self) {
        let snapshot = {
            let mut controller = self.controller.lock().await;
            controller.on_progress(self.widget.current_time());
            controller.on_duration(self.widget.duration());
            controller.flush_snapshot()
        };
        self.progress
            .save_progress(
                self.course_id,
                snapshot.played_fraction,
                Some(snapshot.completed),
            )
            .await;
    }
}
