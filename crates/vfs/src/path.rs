//! Path normalization shared by the backends
//!
//! Two paths are equal iff, after normalizing every backslash to a forward
//! slash, they compare equal case-insensitively. The canonical form below is
//! the single rule used for container keys, parent computation, and prefix
//! matching.

/// Separator-normalized path with original casing, no trailing slash
pub(crate) fn display_form(path: &str) -> String {
    let display = path.replace('\\', "/");
    if display.len() > 1 {
        display.trim_end_matches('/').to_string()
    } else {
        display
    }
}

/// Canonical key form: separator-normalized and lowercased
pub(crate) fn canonical(path: &str) -> String {
    display_form(path).to_lowercase()
}

/// Parent of a separator-normalized path; `None` for root-relative
/// single-segment paths, which need no directory precondition
pub(crate) fn parent_of(display: &str) -> Option<&str> {
    match display.rfind('/') {
        None | Some(0) => None,
        Some(idx) => Some(&display[..idx]),
    }
}

/// Every ancestor prefix of a separator-normalized path plus the path itself
pub(crate) fn ancestors(display: &str) -> impl Iterator<Item = &str> {
    display
        .char_indices()
        .filter(|&(i, ch)| ch == '/' && i > 0)
        .map(|(i, _)| &display[..i])
        .chain(std::iter::once(display))
        .filter(|p| !p.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_collapses_case_and_separators() {
        assert_eq!(canonical("A\\B.txt"), canonical("a/b.TXT"));
        assert_eq!(display_form("a\\b/c/"), "a/b/c");
    }

    #[test]
    fn parent_rules() {
        assert_eq!(parent_of("a/b/c.txt"), Some("a/b"));
        assert_eq!(parent_of("c.txt"), None);
        assert_eq!(parent_of("/c.txt"), None);
    }

    #[test]
    fn ancestors_include_every_level() {
        let all: Vec<_> = ancestors("a/b/c").collect();
        assert_eq!(all, vec!["a", "a/b", "a/b/c"]);

        let rooted: Vec<_> = ancestors("/a/b").collect();
        assert_eq!(rooted, vec!["/a", "/a/b"]);
    }
}
