use crate::progress_service::COMPLETION_THRESHOLD;

/// Lifecycle of one playback session.
///
/// `Ready` is entered exactly once, when the widget first reports metadata;
/// later ready callbacks never move the machine backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Uninitialized,
    Ready,
    Playing,
    Paused,
    Ended,
}

/// What a flush writes: the played fraction and the derived completion flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlushSnapshot {
    pub played_fraction: f64,
    pub completed: bool,
}

/// Deterministic core of the playback session: tracks state, position, and
/// duration from widget events and decides on the resume seek and flush
/// contents. Owns no timers; the async driver supplies those.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    ready: bool,
    duration: f64,
    current_time: f64,
    initial_fraction: f64,
    resume_seek_done: bool,
}

impl PlaybackController {
    /// `initial_fraction` is the previously stored progress for the course,
    /// used for the one-time resume seek.
    #[must_use]
    pub fn new(initial_fraction: f64) -> Self {
        Self {
            state: PlaybackState::Uninitialized,
            ready: false,
            duration: 0.0,
            current_time: 0.0,
            initial_fraction,
            resume_seek_done: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Widget reported readiness, with whatever duration it knows so far.
    pub fn on_ready(&mut self, duration: f64) {
        self.ready = true;
        if self.state == PlaybackState::Uninitialized {
            self.state = PlaybackState::Ready;
        }
        self.on_duration(duration);
    }

    /// Duration updates; non-positive reports are ignored so a known duration
    /// is never clobbered.
    pub fn on_duration(&mut self, duration: f64) {
        if duration > 0.0 {
            self.duration = duration;
        }
    }

    pub fn on_play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn on_pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn on_ended(&mut self) {
        self.state = PlaybackState::Ended;
    }

    pub fn on_progress(&mut self, played_seconds: f64) {
        self.current_time = played_seconds;
    }

    /// The one-time resume seek, in seconds.
    ///
    /// Fires at most once per session: only after the widget has become
    /// ready, with a known duration, and a stored fraction strictly between
    /// 0 and the completion threshold. Repeated ready reports never re-arm
    /// it.
    pub fn resume_seek_target(&mut self) -> Option<f64> {
        if self.resume_seek_done
            || !self.ready
            || self.duration <= 0.0
            || self.initial_fraction <= 0.0
            || self.initial_fraction >= COMPLETION_THRESHOLD
        {
            return None;
        }
        self.resume_seek_done = true;
        let target = self.initial_fraction * self.duration;
        self.current_time = target;
        Some(target)
    }

    /// The values a flush would write right now.
    ///
    /// With an unknown or zero duration the divisor is substituted with 1,
    /// yielding `played_fraction = current_time` unclamped; with a known
    /// duration the fraction is clamped to 1.
    #[must_use]
    pub fn flush_snapshot(&self) -> FlushSnapshot {
        let played_fraction = if self.duration > 0.0 {
            (self.current_time / self.duration).min(1.0)
        } else {
            self.current_time
        };
        FlushSnapshot {
            played_fraction,
            completed: played_fraction >= COMPLETION_THRESHOLD,
        }
    }

    /// Teardown only flushes when there is actual progress to save.
    #[must_use]
    pub fn should_flush_on_teardown(&self) -> bool {
        self.current_time > 0.0
    }
}
