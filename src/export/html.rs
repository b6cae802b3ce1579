//! HTML Export Generation
//!
//! This module turns the document into the HTML that "Save as HTML" writes:
//! by default the bare rendered fragment, optionally wrapped in a complete
//! styled document. It also builds the `data:` URI used by the download
//! fallback.

use crate::error::{Error, Result};
use crate::markdown::Converter;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// File name every export is saved under.
pub const EXPORT_FILE_NAME: &str = "export.html";

/// MIME type of exported files.
pub const HTML_MIME: &str = "text/html; charset=utf-8";

/// Prefix of the download fallback's URI.
const DATA_URI_PREFIX: &str = "data:text/html;charset=utf-8,";

/// Marker directly before the rendered body in a standalone document.
const BODY_START: &str = "<article class=\"markdown-body\">\n";

/// Marker directly after the rendered body in a standalone document.
const BODY_END: &str = "</article>";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Render `markdown` into the exact text written to `export.html`.
///
/// With `standalone` false this is `converter.render(markdown)` unchanged.
pub fn export_html(markdown: &str, converter: &Converter, standalone: bool) -> String {
    let body = converter.render(markdown);
    if standalone {
        generate_html_document(&body, document_title(markdown).as_deref())
    } else {
        body
    }
}

/// Wrap an HTML fragment in a complete document with inlined CSS.
pub fn generate_html_document(body_html: &str, title: Option<&str>) -> String {
    let doc_title = title.unwrap_or("Exported Document");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Markpad">
    <title>{title}</title>
    <style>
{base_css}
    </style>
</head>
<body>
    {body_start}{body}{body_end}
</body>
</html>"#,
        title = html_escape(doc_title),
        base_css = BASE_CSS,
        body_start = BODY_START,
        body = body_html,
        body_end = BODY_END,
    )
}

/// Recover the rendered body from an exported file.
///
/// Fragments are returned as-is; standalone documents have their wrapper
/// stripped.
pub fn extract_body(exported: &str) -> &str {
    let Some(start) = exported.find(BODY_START) else {
        return exported;
    };
    let body_start = start + BODY_START.len();
    match exported.rfind(BODY_END) {
        Some(end) if end >= body_start => &exported[body_start..end],
        _ => &exported[body_start..],
    }
}

/// First level-one heading of the document, used as the page title.
fn document_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Data URI
// ─────────────────────────────────────────────────────────────────────────────

/// A percent-encoded `data:text/html` URI carrying an exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri(String);

impl DataUri {
    /// Percent-encode `content` behind the HTML data prefix.
    pub fn encode(content: &str) -> Self {
        Self(format!("{}{}", DATA_URI_PREFIX, urlencoding::encode(content)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload back into text.
    pub fn decode(&self) -> Result<String> {
        let payload = self.0.strip_prefix(DATA_URI_PREFIX).ok_or_else(|| {
            Error::Application("Not an HTML data URI".to_string())
        })?;
        urlencoding::decode(payload)
            .map(|text| text.into_owned())
            .map_err(|e| Error::Application(format!("Malformed data URI: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for standalone exports; follows the viewer's color scheme.
const BASE_CSS: &str = r#"
:root {
    color-scheme: light dark;
}

*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.markdown-body {
    max-width: 900px;
    margin: 0 auto;
    padding: 32px 24px;
}

.markdown-body h1,
.markdown-body h2 {
    border-bottom: 1px solid rgba(128, 128, 128, 0.35);
    padding-bottom: 0.3em;
}

.markdown-body a {
    color: #2f81f7;
    text-decoration: none;
}

.markdown-body a:hover {
    text-decoration: underline;
}

.markdown-body blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    border-left: 4px solid rgba(128, 128, 128, 0.5);
    opacity: 0.85;
}

.markdown-body code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    background-color: rgba(128, 128, 128, 0.15);
}

.markdown-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    background-color: rgba(128, 128, 128, 0.12);
}

.markdown-body pre code {
    padding: 0;
    background: transparent;
}

.markdown-body table {
    border-collapse: collapse;
    margin-bottom: 16px;
}

.markdown-body th,
.markdown-body td {
    padding: 6px 12px;
    border: 1px solid rgba(128, 128, 128, 0.35);
}

.markdown-body img {
    max-width: 100%;
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Utility Functions
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
