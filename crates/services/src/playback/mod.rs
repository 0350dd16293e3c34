//! Playback session control: a deterministic state machine over widget
//! events, and an async driver that owns the resume-seek, sampling, and
//! debounce timers.

mod controller;
mod session;
mod timers;
mod widget;

pub use controller::{FlushSnapshot, PlaybackController, PlaybackState};
pub use session::{PlaybackSession, PlaybackTiming};
pub use widget::PlayerWidget;
