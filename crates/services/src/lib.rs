#![forbid(unsafe_code)]

pub mod auth_service;
pub mod catalog_loader;
pub mod error;
pub mod events;
pub mod playback;
pub mod progress_service;

pub use watch_core::Clock;

pub use auth_service::AuthService;
pub use catalog_loader::{load_catalog, parse_catalog};
pub use error::CatalogLoadError;
pub use events::{ProgressChanged, ProgressEvents};
pub use playback::{
    FlushSnapshot, PlaybackController, PlaybackSession, PlaybackState, PlaybackTiming,
    PlayerWidget,
};
pub use progress_service::{ProgressService, COMPLETION_THRESHOLD, DEFAULT_RECENT_LIMIT};
