//! Document Export Module for Markpad
//!
//! # Supported Export Formats
//!
//! - **HTML File**: `export.html`, either the rendered fragment or a
//!   complete document with inlined CSS
//! - **Clipboard HTML**: Copy rendered HTML to clipboard for pasting in other apps
//!
//! # Architecture
//!
//! - `html.rs` - HTML generation and the `data:` URI used for downloads
//! - `clipboard.rs` - Platform clipboard operations

pub mod clipboard;
pub mod html;

pub use clipboard::copy_html_to_clipboard;
pub use html::{export_html, extract_body, DataUri, EXPORT_FILE_NAME, HTML_MIME};
