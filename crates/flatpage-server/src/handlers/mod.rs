//! HTTP request handlers.

pub(crate) mod health;
pub(crate) mod pages;

/// Whether `name` is a valid page name: non-empty, alphanumerics and
/// slashes only. Anything else is not dispatched to the page resolver.
pub(crate) fn is_valid_page_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alphanumerics_and_slashes() {
        assert!(is_valid_page_name("index"));
        assert!(is_valid_page_name("blog/post1"));
    }

    #[test]
    fn rejects_other_characters() {
        assert!(!is_valid_page_name(""));
        assert!(!is_valid_page_name("style.css"));
        assert!(!is_valid_page_name("../etc/passwd"));
        assert!(!is_valid_page_name("a b"));
    }
}
