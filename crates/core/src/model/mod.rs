mod catalog;
mod course;
mod ids;
mod progress;
mod session;
mod user;

pub use catalog::Catalog;
pub use course::{Course, CourseError, CourseRecord};
pub use ids::{CourseId, UserId};
pub use progress::{ProgressLog, ProgressRecord};
pub use session::{SessionState, UserData};
pub use user::{UserAccount, UserRole};
