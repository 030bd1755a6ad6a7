//! Markdown block rendered to HTML.

use dioxus::prelude::*;

/// Render markdown to HTML.
///
/// Raw HTML in the source is omitted from the output.
#[must_use]
pub fn render_markdown(src: &str) -> String {
    let mut options = comrak::Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    comrak::markdown_to_html(src, &options)
}

/// Props for the [`Markdown`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MarkdownProps {
    /// Markdown source.
    src: String,
}

/// Renders a markdown document.
#[component]
pub fn Markdown(props: MarkdownProps) -> Element {
    let html = render_markdown(&props.src);

    rsx! {
        div { class: "markdown", dangerous_inner_html: "{html}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render_markdown("# WiscAr\n\nThe **lab** archive.");
        assert!(html.contains("<h1>WiscAr</h1>"));
        assert!(html.contains("<strong>lab</strong>"));
    }

    #[test]
    fn raw_html_is_not_passed_through() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }
}
