use std::fs;
use std::path::Path;

use watch_core::model::{Catalog, Course, CourseRecord};

use crate::error::CatalogLoadError;

/// Parse catalog JSON (an array of course records) into a validated catalog.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the JSON does not parse or any record fails
/// course validation. The catalog is trusted startup input, so a bad file is
/// a bootstrap error rather than a runtime condition.
pub fn parse_catalog(raw: &str) -> Result<Catalog, CatalogLoadError> {
    let records: Vec<CourseRecord> = serde_json::from_str(raw)?;
    let courses = records
        .into_iter()
        .map(Course::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalog::new(courses))
}

/// Read and parse the static catalog file, once at startup.
///
/// # Errors
///
/// Returns `CatalogLoadError::Io` if the file cannot be read, and the
/// `parse_catalog` errors otherwise.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use watch_core::model::CourseId;

    #[test]
    fn parses_a_catalog_array() {
        let catalog = parse_catalog(
            r#"[
                {"courseId": 1, "courseTitle": "高一数学", "videoUrl": "https://example.com/1.mp4"},
                {"courseId": 2, "courseTitle": "高一英语", "videoUrl": "https://example.com/2.mp4"}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.get(CourseId::new(1)).unwrap().title(), "高一数学");
    }

    #[test]
    fn rejects_invalid_records() {
        let result = parse_catalog(
            r#"[{"courseId": 1, "courseTitle": "", "videoUrl": "https://example.com/1.mp4"}]"#,
        );
        assert!(matches!(result, Err(CatalogLoadError::Course(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_catalog("not json"),
            Err(CatalogLoadError::Parse(_))
        ));
    }
}
