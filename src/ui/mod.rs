//! UI components for Markpad
//!
//! This module contains the top bar; the two panes live in `editor` and
//! `preview`.

mod top_bar;

pub use top_bar::{TopBar, TopBarAction};
