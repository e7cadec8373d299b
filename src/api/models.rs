//! Value records built from one listing response each.
//!
//! Records are constructed from the raw JSON objects a [`Listing`] yields,
//! consumed by the exporter, and dropped. Nothing is cached across a run.
//!
//! [`Listing`]: super::Listing

use std::path::PathBuf;

use serde_json::Value;

use super::JsonObject;
use crate::download::{sanitize_name, sanitize_path};

/// Reads a field as text the way the API's loose typing requires.
///
/// Strings are used as-is, other scalars are rendered (Canvas ids are numbers),
/// `null` and missing keys are `None`, and nested values become their JSON text.
#[must_use]
pub fn string_field(object: &JsonObject, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// A course the user is actively enrolled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// Canvas course id.
    pub id: String,
    /// Display name, when the API sent one.
    pub name: Option<String>,
    /// Enrollment term object, requested via `include[]=term`.
    pub term: Option<Value>,
}

impl Course {
    /// Builds a course from a listing object. Returns `None` without an `id`.
    #[must_use]
    pub fn from_json(object: &JsonObject) -> Option<Self> {
        Some(Self {
            id: string_field(object, "id")?,
            name: string_field(object, "name"),
            term: object.get("term").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Local directory name: the sanitized name, or `course-<id>` without one.
    #[must_use]
    pub fn dir_name(&self) -> String {
        match &self.name {
            Some(name) => sanitize_name(name),
            None => sanitize_name(&format!("course-{}", self.id)),
        }
    }

    /// Term name for log context, if the term object carries one.
    #[must_use]
    pub fn term_name(&self) -> Option<&str> {
        self.term.as_ref()?.get("name")?.as_str()
    }
}

/// A folder in a course's file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Canvas folder id.
    pub id: String,
    /// Slash-separated path from the course root, e.g. `course files/Week 1`.
    pub full_name: Option<String>,
    /// Bare folder name, used when `full_name` is missing.
    pub name: Option<String>,
}

impl Folder {
    /// Builds a folder from a listing object. Returns `None` without an `id`.
    #[must_use]
    pub fn from_json(object: &JsonObject) -> Option<Self> {
        Some(Self {
            id: string_field(object, "id")?,
            full_name: string_field(object, "full_name"),
            name: string_field(object, "name"),
        })
    }

    /// Path of this folder relative to its course directory.
    ///
    /// A name made only of slashes is the course root and maps to the course
    /// directory itself (an empty path). Otherwise the name chain goes through
    /// [`sanitize_path`], one path component per segment.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let raw = self.full_name.as_deref().or(self.name.as_deref());
        if raw.is_some_and(|r| !r.is_empty() && r.chars().all(|c| c == '/')) {
            return PathBuf::new();
        }
        sanitize_path(raw).split('/').collect()
    }
}

/// A downloadable file as reported by a folder's files listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Direct, already-resolved content URL.
    pub url: String,
    /// Raw display name, before sanitizing.
    pub display_name: String,
}

impl FileDescriptor {
    /// Builds a file descriptor from a listing object.
    ///
    /// The name is `display_name`, else `filename`, else `id`. Returns `None`
    /// when there is no `url` or no name at all.
    #[must_use]
    pub fn from_json(object: &JsonObject) -> Option<Self> {
        let url = string_field(object, "url").filter(|u| !u.is_empty())?;
        let display_name = string_field(object, "display_name")
            .or_else(|| string_field(object, "filename"))
            .or_else(|| string_field(object, "id"))?;
        Some(Self { url, display_name })
    }

    /// Local file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        sanitize_name(&self.display_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_string_field_renders_scalars() {
        let obj = object(json!({"id": 42, "s": "x", "b": true, "n": null, "o": {"k": 1}}));
        assert_eq!(string_field(&obj, "id").as_deref(), Some("42"));
        assert_eq!(string_field(&obj, "s").as_deref(), Some("x"));
        assert_eq!(string_field(&obj, "b").as_deref(), Some("true"));
        assert_eq!(string_field(&obj, "n"), None);
        assert_eq!(string_field(&obj, "missing"), None);
        assert_eq!(string_field(&obj, "o").as_deref(), Some(r#"{"k":1}"#));
    }

    #[test]
    fn test_course_from_json_with_term() {
        let obj = object(json!({"id": 10, "name": "Algorithms", "term": {"name": "Fall 2024"}}));
        let course = Course::from_json(&obj).unwrap();
        assert_eq!(course.id, "10");
        assert_eq!(course.dir_name(), "Algorithms");
        assert_eq!(course.term_name(), Some("Fall 2024"));
    }

    #[test]
    fn test_course_without_name_uses_id_fallback() {
        let obj = object(json!({"id": "77"}));
        let course = Course::from_json(&obj).unwrap();
        assert_eq!(course.dir_name(), "course-77");
        assert_eq!(course.term_name(), None);
    }

    #[test]
    fn test_course_name_is_sanitized() {
        let obj = object(json!({"id": 1, "name": "CS 101: Intro / Lab"}));
        assert_eq!(Course::from_json(&obj).unwrap().dir_name(), "CS 101_ Intro _ Lab");
    }

    #[test]
    fn test_course_without_id_is_rejected() {
        let obj = object(json!({"name": "Orphan"}));
        assert!(Course::from_json(&obj).is_none());
    }

    #[test]
    fn test_folder_relative_path_from_full_name() {
        let obj = object(json!({"id": 5, "full_name": "course files/Week 1: Intro", "name": "x"}));
        let folder = Folder::from_json(&obj).unwrap();
        assert_eq!(
            folder.relative_path(),
            PathBuf::from("course files").join("Week 1_ Intro")
        );
    }

    #[test]
    fn test_folder_root_maps_to_course_directory() {
        let obj = object(json!({"id": 5, "full_name": "/"}));
        assert_eq!(Folder::from_json(&obj).unwrap().relative_path(), PathBuf::new());
    }

    #[test]
    fn test_folder_falls_back_to_name_then_literal() {
        let named = object(json!({"id": 5, "name": "Slides"}));
        assert_eq!(
            Folder::from_json(&named).unwrap().relative_path(),
            PathBuf::from("Slides")
        );

        let anonymous = object(json!({"id": 6}));
        assert_eq!(
            Folder::from_json(&anonymous).unwrap().relative_path(),
            PathBuf::from("folder")
        );

        let empty = object(json!({"id": 7, "full_name": ""}));
        assert_eq!(
            Folder::from_json(&empty).unwrap().relative_path(),
            PathBuf::from("folder")
        );
    }

    #[test]
    fn test_file_descriptor_name_fallbacks() {
        let display = object(json!({"url": "https://x/1", "display_name": "notes.pdf", "filename": "n.pdf"}));
        assert_eq!(
            FileDescriptor::from_json(&display).unwrap().file_name(),
            "notes.pdf"
        );

        let filename = object(json!({"url": "https://x/2", "filename": "raw:name.pdf"}));
        assert_eq!(
            FileDescriptor::from_json(&filename).unwrap().file_name(),
            "raw_name.pdf"
        );

        let id_only = object(json!({"url": "https://x/3", "id": 99}));
        assert_eq!(FileDescriptor::from_json(&id_only).unwrap().file_name(), "99");
    }

    #[test]
    fn test_file_descriptor_requires_url_and_name() {
        let no_url = object(json!({"display_name": "a.pdf"}));
        assert!(FileDescriptor::from_json(&no_url).is_none());

        let empty_url = object(json!({"url": "", "display_name": "a.pdf"}));
        assert!(FileDescriptor::from_json(&empty_url).is_none());

        let no_name = object(json!({"url": "https://x/4"}));
        assert!(FileDescriptor::from_json(&no_name).is_none());
    }
}
