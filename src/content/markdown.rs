//! A small markdown-like renderer for blog and career post bodies.
//!
//! The grammar is applied as ordered whole-document substitutions, so later
//! rules see the HTML produced by earlier ones. Output is not escaped and the
//! transformation is not idempotent: render stored source exactly once.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(\d+)\. (.*)$").unwrap());
static LIST_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<li>.*</li>\n?)+").unwrap());

/// Renders `source` to an HTML fragment. Never fails.
pub fn render(source: &str) -> String {
    let html = H3.replace_all(source, "<h3>${1}</h3>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    let html = H1.replace_all(&html, "<h1>${1}</h1>");

    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");

    let html = BULLET.replace_all(&html, "<li>${1}</li>");
    let html = NUMBERED.replace_all(&html, "<li>${2}</li>");
    // Ordered and unordered runs both become <ul>.
    let html = LIST_RUN.replace_all(&html, |caps: &Captures| format!("<ul>{}</ul>", &caps[0]));

    let html = html
        .split("\n\n")
        .map(|block| {
            if block.trim().is_empty() {
                String::new()
            } else if block.starts_with('<') {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    html.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_then_paragraph_with_emphasis() {
        let html = render("# Title\n\nSome **bold** and *italic* text.");
        assert_eq!(
            html,
            "<h1>Title</h1><br><p>Some <strong>bold</strong> and <em>italic</em> text.</p>"
        );
    }

    #[test]
    fn headers_match_most_hashes_first() {
        assert_eq!(render("### Three"), "<h3>Three</h3>");
        assert_eq!(render("## Two"), "<h2>Two</h2>");
        assert_eq!(render("#NoSpace"), "<p>#NoSpace</p>");
        assert_eq!(render("#### Four"), "<p>#### Four</p>");
    }

    #[test]
    fn consecutive_items_share_one_list() {
        let html = render("- A\n- B\n- C");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html, "<ul><li>A</li><br><li>B</li><br><li>C</li></ul>");
    }

    #[test]
    fn numbered_items_become_unordered() {
        let html = render("Steps:\n\n1. Code\n2. Bill");
        assert_eq!(html, "<p>Steps:</p><br><ul><li>Code</li><br><li>Bill</li></ul>");
    }

    #[test]
    fn separated_lists_are_wrapped_separately() {
        let html = render("- A\n\n- B");
        assert_eq!(html.matches("<ul>").count(), 2);
    }

    #[test]
    fn unmatched_markers_degrade_without_failing() {
        assert_eq!(render("an **unclosed marker"), "<p>an <em></em>unclosed marker</p>");
        assert_eq!(render("plain *star"), "<p>plain *star</p>");
    }

    #[test]
    fn single_newlines_become_breaks_and_blank_blocks_vanish() {
        assert_eq!(render("line one\nline two"), "<p>line one<br>line two</p>");
        assert_eq!(render("a\n\n\n\nb"), "<p>a</p><br><br><p>b</p>");
        assert_eq!(render(""), "");
    }

    #[test]
    fn embedded_html_is_not_escaped() {
        assert_eq!(render("<div>raw</div>"), "<div>raw</div>");
    }

    #[test]
    fn first_pass_output_is_pinned() {
        let source = "## Coding tips\n\nUse **modifiers**\ncarefully.";
        assert_eq!(
            render(source),
            "<h2>Coding tips</h2><br><p>Use <strong>modifiers</strong><br>carefully.</p>"
        );
    }

    #[test]
    fn rendering_twice_is_not_the_same_as_once() {
        let once = render("*one\ntwo*");
        assert_eq!(once, "<p>*one<br>two*</p>");
        assert_eq!(render(&once), "<p><em>one<br>two</em></p>");
    }
}
