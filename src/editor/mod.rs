//! Editor module for Markpad
//!
//! This module contains the text editor pane for the markdown document.

mod widget;

pub use widget::{EditorOutput, EditorPane};
