//! Clipboard Operations for HTML Export
//!
//! This module copies the rendered document to the system clipboard using
//! the arboard crate. Rich-text targets receive the HTML; plain-text targets
//! receive the markdown source.

use crate::error::Result;
use crate::markdown::Converter;
use arboard::Clipboard;
use log::debug;

/// Copy the rendered document to the clipboard.
///
/// Apps like email clients and word processors paste the formatted HTML;
/// everything else gets the markdown text.
///
/// # Example
///
/// ```ignore
/// copy_html_to_clipboard("# Hello\n\n**Bold** text", &converter)?;
/// ```
pub fn copy_html_to_clipboard(markdown: &str, converter: &Converter) -> Result<()> {
    let html = converter.render(markdown);
    copy_html_with_fallback(&html, markdown)
}

/// Copy HTML with plain text fallback to clipboard.
pub fn copy_html_with_fallback(html: &str, plain_text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(html, Some(plain_text))?;
    debug!("Copied {} bytes of HTML to clipboard", html.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::error::Error;

    #[test]
    fn test_arboard_error_maps_to_clipboard_error() {
        let err: Error = arboard::Error::ContentNotAvailable.into();
        assert!(matches!(err, Error::Clipboard(_)));
        assert!(err.to_string().starts_with("Clipboard error"));
    }

    // Actual clipboard writes need a display server, which CI lacks.
}
