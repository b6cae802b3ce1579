//! Markdown rendering module
//!
//! Uses comrak, a CommonMark + GFM compatible parser, to produce both the
//! HTML used for export and the node tree drawn by the preview pane.
//!
//! # Example
//! ```ignore
//! use crate::markdown::Converter;
//!
//! let converter = Converter::default();
//! let html = converter.render("line1\nline2 [x](https://example.com)");
//! let doc = converter.parse("# Hello");
//! ```

mod converter;
mod parser;

pub use converter::{open_links_in_new_tab, Converter, ConverterOptions};
pub use parser::{
    HeadingLevel, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, TableAlignment,
};
