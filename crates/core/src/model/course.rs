use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::CourseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title must not be empty")]
    EmptyTitle,

    #[error("invalid video url: {raw}")]
    InvalidVideoUrl { raw: String },
}

/// Wire shape for a catalog entry, matching the static JSON file.
///
/// Field names follow the catalog's camelCase keys (`courseId`, `courseTitle`,
/// `videoUrl`, ...). Validation happens when converting into a [`Course`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub course_id: u64,
    pub course_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
}

/// A single entry in the course catalog.
///
/// Courses are immutable once loaded; there is no lifecycle beyond startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    video_url: Url,
    thumbnail_url: Option<String>,
    category: Option<String>,
    duration_secs: Option<f64>,
    instructor: Option<String>,
}

impl Course {
    /// Create a course with just the required fields.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` for a blank title and
    /// `CourseError::InvalidVideoUrl` if the URL does not parse.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        video_url: &str,
    ) -> Result<Self, CourseError> {
        Self::from_record(CourseRecord {
            course_id: id.value(),
            course_title: title.into(),
            description: None,
            video_url: video_url.to_owned(),
            thumbnail_url: None,
            category: None,
            duration: None,
            instructor: None,
        })
    }

    /// Validate a raw catalog record into a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the title is empty or the video URL is invalid.
    pub fn from_record(record: CourseRecord) -> Result<Self, CourseError> {
        let title = record.course_title.trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        let video_url = Url::parse(&record.video_url).map_err(|_| CourseError::InvalidVideoUrl {
            raw: record.video_url.clone(),
        })?;

        Ok(Self {
            id: CourseId::new(record.course_id),
            title,
            description: record.description,
            video_url,
            thumbnail_url: record.thumbnail_url,
            category: record.category,
            duration_secs: record.duration,
            instructor: record.instructor,
        })
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn video_url(&self) -> &Url {
        &self.video_url
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    #[must_use]
    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }
}
