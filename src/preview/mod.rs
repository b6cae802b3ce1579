//! Preview module for Markpad
//!
//! This module provides the rendered preview pane and the synchronized
//! scrolling between it and the editor.

mod sync_scroll;
mod view;

pub use sync_scroll::{Pane, ScrollResponse, SyncScrollState, DEFAULT_DEBOUNCE};
pub use view::{PreviewOutput, PreviewPane};
