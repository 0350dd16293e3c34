use crate::model::{Course, CourseId};

/// Category tags offered by the dashboard, in display order.
const CATEGORIES: [&str; 6] = ["all", "math", "english", "chinese", "physics", "chemistry"];

/// Fixed tag -> title substring mapping used for category partitioning.
///
/// The catalog carries no reliable `category` field, so partitioning matches
/// on the subject name embedded in the course title.
const CATEGORY_NEEDLES: [(&str, &str); 5] = [
    ("math", "数学"),
    ("english", "英语"),
    ("chinese", "语文"),
    ("physics", "物理"),
    ("chemistry", "化学"),
];

/// Read-only lookup over the static course catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// All courses in original catalog order.
    #[must_use]
    pub fn all(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by id. A miss is `None`, never an error.
    #[must_use]
    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id() == id)
    }

    /// Partition the catalog by category tag.
    ///
    /// `"all"` returns the full catalog; known tags match their fixed title
    /// substring case-insensitively; unknown tags yield an empty list without
    /// raising an error.
    #[must_use]
    pub fn by_category(&self, tag: &str) -> Vec<Course> {
        if tag == "all" {
            return self.courses.clone();
        }
        let Some(needle) = CATEGORY_NEEDLES
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, needle)| *needle)
        else {
            return Vec::new();
        };
        self.courses
            .iter()
            .filter(|course| course.title().to_lowercase().contains(needle))
            .cloned()
            .collect()
    }

    /// The category tags the dashboard offers.
    #[must_use]
    pub fn categories() -> &'static [&'static str] {
        &CATEGORIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Course::new(CourseId::new(1), "Algebra", "https://example.com/1.mp4").unwrap(),
            Course::new(
                CourseId::new(2),
                "数学 Basics",
                "https://example.com/2.mp4",
            )
            .unwrap(),
            Course::new(
                CourseId::new(3),
                "初中物理",
                "https://example.com/3.mp4",
            )
            .unwrap(),
        ])
    }

    #[test]
    fn get_returns_first_match_or_none() {
        let catalog = catalog();
        assert_eq!(catalog.get(CourseId::new(2)).unwrap().title(), "数学 Basics");
        assert!(catalog.get(CourseId::new(99)).is_none());
    }

    #[test]
    fn all_preserves_order() {
        let catalog = catalog();
        let ids: Vec<_> = catalog.all().iter().map(Course::id).collect();
        assert_eq!(
            ids,
            vec![CourseId::new(1), CourseId::new(2), CourseId::new(3)]
        );
    }

    #[test]
    fn partitions_math_by_title_substring() {
        let catalog = catalog();
        let math = catalog.by_category("math");
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].id(), CourseId::new(2));
    }

    #[test]
    fn all_tag_returns_everything() {
        assert_eq!(catalog().by_category("all").len(), 3);
    }

    #[test]
    fn unknown_tag_yields_empty_without_error() {
        assert!(catalog().by_category("cooking").is_empty());
    }

    #[test]
    fn categories_offers_all_plus_every_needle_tag() {
        let tags = Catalog::categories();
        assert_eq!(
            tags,
            &["all", "math", "english", "chinese", "physics", "chemistry"]
        );
        for tag in &tags[1..] {
            assert!(CATEGORY_NEEDLES.iter().any(|(known, _)| known == tag));
        }
    }
}
