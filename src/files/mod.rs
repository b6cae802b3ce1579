//! File operations module for Markpad
//!
//! This module provides native file dialogs, the host platform boundary,
//! and the save/open operations built on them.

pub mod dialogs;
mod document_io;
mod host;

pub use document_io::{DocumentIo, LoadOutcome, OpenStatus};
pub use host::{HostPlatform, NativeHost, SaveReceipt, OPEN_EXTENSIONS};
