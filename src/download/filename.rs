//! Filesystem-safe names for courses, folders and files.
//!
//! Display names come straight from the API and may contain path separators,
//! reserved characters, or nothing at all. The two functions here map them to
//! names that are valid on common filesystems and never empty.

/// Literal used when a single name sanitizes to nothing.
const EMPTY_NAME: &str = "unnamed";

/// Literal used when a folder path has no usable segment.
const EMPTY_PATH: &str = "folder";

/// Sanitizes one path segment (a course, folder or file display name).
///
/// - Each of `\ / : * ? " < > |` and every other control character becomes `_`
/// - Runs of whitespace collapse to a single space
/// - Leading and trailing whitespace is trimmed
/// - An empty result, or one made only of dots, becomes `"unnamed"`
///
/// Applying it to its own output is a no-op.
///
/// # Examples
///
/// ```
/// use canvas_export_core::download::sanitize_name;
///
/// assert_eq!(sanitize_name("A/B:C"), "A_B_C");
/// assert_eq!(sanitize_name("  Week   1\tnotes "), "Week 1 notes");
/// assert_eq!(sanitize_name(""), "unnamed");
/// ```
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for ch in name.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
        }
        let mapped = match ch {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        out.push(mapped);
    }

    // "." and ".." would resolve to the current or parent directory
    if out.is_empty() || out.chars().all(|c| c == '.') {
        return EMPTY_NAME.to_string();
    }
    out
}

/// Sanitizes a `/`-separated folder path such as Canvas' `full_name`.
///
/// Leading slashes are stripped, the rest is split on runs of `/`, empty
/// segments are dropped, and each remaining segment goes through
/// [`sanitize_name`]. Segments are joined back with `/`. Absent input, or input
/// with no segments left, yields `"folder"`.
///
/// # Examples
///
/// ```
/// use canvas_export_core::download::sanitize_path;
///
/// assert_eq!(sanitize_path(Some("/Docs//2024/")), "Docs/2024");
/// assert_eq!(sanitize_path(Some("course files/Week: 1")), "course files/Week_ 1");
/// assert_eq!(sanitize_path(Some("")), "folder");
/// assert_eq!(sanitize_path(None), "folder");
/// ```
#[must_use]
pub fn sanitize_path(path: Option<&str>) -> String {
    let Some(path) = path else {
        return EMPTY_PATH.to_string();
    };

    let segments: Vec<String> = path
        .trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.trim().is_empty())
        .map(sanitize_name)
        .collect();

    if segments.is_empty() {
        EMPTY_PATH.to_string()
    } else {
        segments.join("/")
    }
}
