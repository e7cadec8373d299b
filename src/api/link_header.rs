//! `Link` response header parsing for cursor pagination.
//!
//! Canvas paginates every list endpoint through a header of the form
//! `<https://...&page=2>; rel="next", <https://...&page=1>; rel="first"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static LINK_RELATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>;\s*rel="(\w+)""#).expect("link relation regex is valid") // Static pattern, safe to panic
});

/// Parses a `Link` header into relation name → URL.
///
/// Segments are comma separated. A relation claimed by several segments keeps
/// the first URL. Segments that do not match `<URL>; rel="name"` are ignored.
#[must_use]
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut relations = HashMap::new();
    for segment in header.split(',') {
        if let Some(captures) = LINK_RELATION.captures(segment) {
            relations
                .entry(captures[2].to_string())
                .or_insert_with(|| captures[1].to_string());
        }
    }
    relations
}

/// Returns the URL of the `next` relation, if any.
///
/// No header, or a header without `rel="next"`, yields `None`.
///
/// # Examples
///
/// ```
/// use canvas_export_core::api::next_link;
///
/// let header = r#"<https://x/api/v1/courses?page=2>; rel="next", <https://x/api/v1/courses?page=1>; rel="first""#;
/// assert_eq!(next_link(Some(header)).as_deref(), Some("https://x/api/v1/courses?page=2"));
/// assert_eq!(next_link(None), None);
/// ```
#[must_use]
pub fn next_link(header: Option<&str>) -> Option<String> {
    parse_link_header(header?).remove("next")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_HEADER: &str = concat!(
        r#"<https://canvas.example.edu/api/v1/courses?page=1&per_page=100>; rel="current","#,
        r#"<https://canvas.example.edu/api/v1/courses?page=2&per_page=100>; rel="next","#,
        r#"<https://canvas.example.edu/api/v1/courses?page=1&per_page=100>; rel="first","#,
        r#"<https://canvas.example.edu/api/v1/courses?page=4&per_page=100>; rel="last""#
    );

    #[test]
    fn test_next_link_extracts_url_between_brackets() {
        assert_eq!(
            next_link(Some(CANVAS_HEADER)).as_deref(),
            Some("https://canvas.example.edu/api/v1/courses?page=2&per_page=100")
        );
    }

    #[test]
    fn test_next_link_with_spaces_after_commas() {
        let header = r#"<https://x/a?page=1>; rel="first", <https://x/a?page=3>; rel="next""#;
        assert_eq!(next_link(Some(header)).as_deref(), Some("https://x/a?page=3"));
    }

    #[test]
    fn test_next_link_absent_relation_is_none() {
        let header = r#"<https://x/a?page=1>; rel="current", <https://x/a?page=1>; rel="last""#;
        assert_eq!(next_link(Some(header)), None);
    }

    #[test]
    fn test_next_link_no_header_is_none() {
        assert_eq!(next_link(None), None);
        assert_eq!(next_link(Some("")), None);
    }

    #[test]
    fn test_next_link_first_of_duplicates_wins() {
        let header = r#"<https://x/a?page=2>; rel="next", <https://x/a?page=9>; rel="next""#;
        assert_eq!(next_link(Some(header)).as_deref(), Some("https://x/a?page=2"));
    }

    #[test]
    fn test_next_link_ignores_malformed_segments() {
        let header = r#"garbage, https://x/a?page=5; rel="next", <https://x/a?page=6>; rel="next""#;
        assert_eq!(next_link(Some(header)).as_deref(), Some("https://x/a?page=6"));
    }

    #[test]
    fn test_parse_link_header_maps_all_relations() {
        let relations = parse_link_header(CANVAS_HEADER);
        assert_eq!(relations.len(), 4);
        assert!(relations["last"].ends_with("page=4&per_page=100"));
        assert!(relations["first"].ends_with("page=1&per_page=100"));
    }
}
