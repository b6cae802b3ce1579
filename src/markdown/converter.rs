//! Markdown to HTML conversion
//!
//! Wraps comrak with the rendering rules the preview and the HTML export
//! share: single newlines become `<br />` and every link opens in a new tab.

use std::borrow::Cow;
use std::sync::OnceLock;

use comrak::{markdown_to_html, Options};
use regex::{Captures, Regex};

use super::parser::{parse_markdown, MarkdownDocument};
use crate::config::Settings;

/// Attribute added to every anchor in the rendered output.
const NEW_TAB_ATTR: &str = r#" target="_blank""#;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Rendering switches for the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Render a single newline inside a paragraph as a line break
    pub line_breaks: bool,
    /// Pass raw HTML through instead of omitting it
    pub allow_raw_html: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            line_breaks: true,
            allow_raw_html: false,
        }
    }
}

impl ConverterOptions {
    /// Build options from the user's settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            line_breaks: settings.line_breaks,
            allow_raw_html: settings.allow_raw_html,
        }
    }

    /// Convert to comrak Options.
    pub(crate) fn to_comrak_options(self) -> Options {
        let mut options = Options::default();

        // GFM extensions
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;

        options.render.hardbreaks = self.line_breaks;
        options.render.unsafe_ = self.allow_raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Converter
// ─────────────────────────────────────────────────────────────────────────────

/// Turns document text into HTML (for export) or a node tree (for the preview).
///
/// Stateless apart from its options, so calling it every frame is fine.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConverterOptions,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ConverterOptions {
        self.options
    }

    /// Render markdown to an HTML fragment.
    ///
    /// Never fails: any input text produces some HTML.
    pub fn render(&self, markdown: &str) -> String {
        let html = markdown_to_html(markdown, &self.options.to_comrak_options());
        open_links_in_new_tab(&html).into_owned()
    }

    /// Parse markdown into the owned tree the preview pane draws.
    pub fn parse(&self, markdown: &str) -> MarkdownDocument {
        parse_markdown(markdown, &self.options.to_comrak_options())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Link Rewriting
// ─────────────────────────────────────────────────────────────────────────────

fn anchor_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<a(\s[^>]*)?>").expect("anchor regex is valid"))
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s+([^\s=>"']+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?"#)
            .expect("attribute regex is valid")
    })
}

/// Remove any `target` attribute from an anchor's attribute list.
///
/// Attributes are matched whole, so a quoted value mentioning `target=` stays.
fn strip_target_attr(attrs: &str) -> Cow<'_, str> {
    attribute_regex().replace_all(attrs, |caps: &Captures| {
        if caps[1].eq_ignore_ascii_case("target") {
            String::new()
        } else {
            caps[0].to_string()
        }
    })
}

/// Make every `<a>` opening tag in `html` open in a new tab.
///
/// An existing `target` is replaced with `_blank`. Escaped markup
/// (`&lt;a href=...&gt;` inside code) is never touched since it contains no
/// literal `<`.
pub fn open_links_in_new_tab(html: &str) -> Cow<'_, str> {
    anchor_tag_regex().replace_all(html, |caps: &Captures| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        format!("<a{}{}>", strip_target_attr(attrs), NEW_TAB_ATTR)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        Converter::default().render(markdown)
    }

    #[test]
    fn test_soft_line_break_becomes_br() {
        let html = render("line1\nline2");
        assert!(html.contains("line1<br />"), "got: {}", html);
        assert!(html.contains("line2"));
    }

    #[test]
    fn test_line_breaks_disabled_keeps_soft_break() {
        let converter = Converter::new(ConverterOptions {
            line_breaks: false,
            ..ConverterOptions::default()
        });
        let html = converter.render("line1\nline2");
        assert!(!html.contains("<br"));
    }

    #[test]
    fn test_paragraphs_still_split_on_blank_line() {
        let html = render("one\n\ntwo");
        assert_eq!(html.matches("<p>").count(), 2);
    }

    #[test]
    fn test_absolute_link_opens_in_new_tab() {
        let html = render("[x](https://example.com)");
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(">x</a>"));
    }

    #[test]
    fn test_relative_link_opens_in_new_tab() {
        let html = render("[notes](docs/notes.md)");
        assert!(html.contains(r#"href="docs/notes.md""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_autolink_opens_in_new_tab() {
        let html = render("see https://example.org today");
        assert!(html.contains(r#"href="https://example.org""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_every_link_rewritten() {
        let html = render("[a](/a) and [b](/b) and <https://c.example>");
        assert_eq!(html.matches("<a ").count(), 3);
        assert_eq!(html.matches(r#"target="_blank""#).count(), 3);
    }

    #[test]
    fn test_link_with_title_keeps_title() {
        let html = render(r#"[x](https://example.com "Example")"#);
        assert!(html.contains(r#"title="Example""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_code_span_is_not_rewritten() {
        let html = render(r#"`<a href="x">`"#);
        assert!(!html.contains("target="));
        assert!(html.contains("&lt;a href="));
    }

    #[test]
    fn test_raw_html_omitted_by_default() {
        let html = render(r#"<a href="https://raw.example">raw</a>"#);
        assert!(!html.contains("raw.example"));
    }

    #[test]
    fn test_raw_html_anchor_rewritten_when_allowed() {
        let converter = Converter::new(ConverterOptions {
            allow_raw_html: true,
            ..ConverterOptions::default()
        });
        let html = converter.render(r#"<a href="https://raw.example">raw</a>"#);
        assert!(html.contains(r#"href="https://raw.example" target="_blank""#));
    }

    #[test]
    fn test_existing_target_forced_to_blank() {
        let out = open_links_in_new_tab(r#"<a href="/x" target="_self">x</a>"#);
        assert_eq!(out, r#"<a href="/x" target="_blank">x</a>"#);

        let out = open_links_in_new_tab(r#"<a TARGET=top href='/y' class="c">y</a>"#);
        assert_eq!(out, r#"<a href='/y' class="c" target="_blank">y</a>"#);
    }

    #[test]
    fn test_raw_html_anchor_with_target_forced_when_allowed() {
        let converter = Converter::new(ConverterOptions {
            allow_raw_html: true,
            ..ConverterOptions::default()
        });
        let html = converter.render(r#"<a href="https://raw.example" target="_self">raw</a>"#);
        assert!(html.contains(r#"<a href="https://raw.example" target="_blank">"#));
        assert!(!html.contains("_self"));
    }

    #[test]
    fn test_target_inside_title_does_not_count() {
        let out = open_links_in_new_tab(r#"<a href="/x" title="set target=top">x</a>"#);
        assert!(out.ends_with(r#"title="set target=top" target="_blank">x</a>"#));
    }

    #[test]
    fn test_other_tags_untouched() {
        let html = "<abbr>x</abbr><article>y</article>";
        assert_eq!(open_links_in_new_tab(html), html);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_gfm_table_rendered() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_parse_uses_same_options() {
        let doc = Converter::default().parse("[x](https://example.com)");
        assert_eq!(doc.links(), vec!["https://example.com".to_string()]);
    }
}
