//! Native file dialog integration using the rfd crate
//!
//! This module provides functions to open native file picker dialogs
//! for opening a document and saving an HTML export.

use rfd::FileDialog;
use std::path::PathBuf;

/// Extensions offered when saving an export.
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Opens a native file dialog restricted to the given extensions.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn pick_text_file_dialog(extensions: &[&str]) -> Option<PathBuf> {
    let label = extensions
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ");

    FileDialog::new()
        .set_title("Open File")
        .add_filter(label, extensions)
        .pick_file()
}

/// Opens a native save dialog for an HTML export.
///
/// Starts in the downloads folder with `file_name` prefilled.
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_html_dialog(file_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save as HTML")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .set_file_name(file_name);

    if let Some(dir) = dirs::download_dir() {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}
