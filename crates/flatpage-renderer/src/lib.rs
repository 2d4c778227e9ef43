//! Markdown to HTML conversion.
//!
//! Pages are authored in plain CommonMark. Conversion is a single pass
//! through `pulldown-cmark` with no extensions enabled, so the output
//! for a given source is stable across requests.

use pulldown_cmark::{Options, Parser, html};

/// Convert markdown source to an HTML fragment.
///
/// CommonMark only; GFM extensions (tables, strikethrough, task lists)
/// are not recognized and render as plain text.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heading() {
        assert_eq!(render_markdown("# Hi"), "<h1>Hi</h1>\n");
    }

    #[test]
    fn paragraph_with_emphasis() {
        assert_eq!(
            render_markdown("some *emphasized* text"),
            "<p>some <em>emphasized</em> text</p>\n"
        );
    }

    #[test]
    fn link() {
        assert_eq!(
            render_markdown("[home](/index)"),
            "<p><a href=\"/index\">home</a></p>\n"
        );
    }

    #[test]
    fn list() {
        assert_eq!(
            render_markdown("- one\n- two\n"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            render_markdown("```\nlet x = 1;\n```"),
            "<pre><code>let x = 1;\n</code></pre>\n"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(render_markdown("a & b"), "<p>a &amp; b</p>\n");
    }

    #[test]
    fn raw_html_passes_through() {
        assert_eq!(
            render_markdown("<div class=\"note\">hi</div>"),
            "<div class=\"note\">hi</div>"
        );
    }

    #[test]
    fn gfm_table_syntax_is_not_a_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn conversion_is_deterministic() {
        let source = "# Title\n\nBody with [a link](/x).\n";
        assert_eq!(render_markdown(source), render_markdown(source));
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_markdown(""), "");
    }
}
