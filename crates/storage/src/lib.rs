#![forbid(unsafe_code)]

pub mod documents;
pub mod repository;
pub mod sqlite;

pub use documents::{SessionStore, UserDirectory, AUTH_STATE_KEY, USERS_KEY};
pub use repository::{DocumentStore, InMemoryStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
