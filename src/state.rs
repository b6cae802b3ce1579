//! Application state management for Markpad
//!
//! This module defines the central `AppState` struct that owns the document,
//! the settings and the current view mode. Widgets never touch it directly;
//! they return outputs and actions which the app applies through the methods
//! here.

use crate::config::{Settings, ViewMode};
use crate::error::Error;
use crate::files::LoadOutcome;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Sample shown on first launch.
pub const WELCOME_DOCUMENT: &str = include_str!("../assets/welcome.md");

/// How long toasts stay visible (seconds).
pub const TOAST_DURATION: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The markdown text being edited.
///
/// `version` increases on every mutation so views can tell when to rebuild
/// derived data. `generation` increases only when the whole text is replaced
/// from outside the editor (a file load), so the editor keeps its focus and
/// cursor while the user types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    version: u64,
    generation: u64,
    path: Option<PathBuf>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: 0,
            generation: 0,
            path: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// File the text was last loaded from, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Window title fragment.
    pub fn title(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.version += 1;
    }

    fn replace(&mut self, text: String, path: PathBuf) {
        self.set_text(text);
        self.generation += 1;
        self.path = Some(path);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(WELCOME_DOCUMENT)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Temporary toast message
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
    /// Editor cursor as (line, column), 0-indexed
    pub cursor: Option<(usize, usize)>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    pub document: Document,
    pub settings: Settings,
    pub ui: UiState,
    view_mode: ViewMode,
}

impl AppState {
    /// Create state with the welcome document and the configured startup mode.
    pub fn with_settings(settings: Settings) -> Self {
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, View mode: {:?}",
            settings.theme, settings.view_mode
        );

        Self {
            document: Document::default(),
            view_mode: settings.view_mode,
            settings,
            ui: UiState::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Mode
    // ─────────────────────────────────────────────────────────────────────────

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Edit-mode toggle pressed.
    pub fn toggle_edit_mode(&mut self) -> ViewMode {
        self.set_view_mode(self.view_mode.toggle_edit())
    }

    /// Reader-mode toggle pressed.
    pub fn toggle_reader_mode(&mut self) -> ViewMode {
        self.set_view_mode(self.view_mode.toggle_reader())
    }

    fn set_view_mode(&mut self, mode: ViewMode) -> ViewMode {
        debug!("View mode: {:?} -> {:?}", self.view_mode, mode);
        self.view_mode = mode;
        mode
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    /// The editor produced new text.
    pub fn on_text_changed(&mut self, text: String) {
        if text != self.document.text {
            self.document.set_text(text);
        }
    }

    /// Apply a finished "Open from disk".
    ///
    /// A successful load replaces the whole document. A failed one leaves it
    /// untouched; the error is logged and only surfaced when
    /// `report_file_errors` is set.
    pub fn apply_load_outcome(&mut self, outcome: LoadOutcome, current_time: f64) {
        match outcome {
            LoadOutcome::Loaded { path, text } => {
                info!("Loaded file: {}", path.display());
                self.document.replace(text, path);
                self.ui.cursor = None;
            }
            LoadOutcome::Failed(e) => self.report_file_error("Failed to open file", &e, current_time),
        }
    }

    /// Log a file error; show it only when the user asked for that.
    pub fn report_file_error(&mut self, context: &str, error: &Error, current_time: f64) {
        warn!("{}: {}", context, error);
        if self.settings.report_file_errors {
            self.show_toast(format!("{}: {}", context, error), current_time, TOAST_DURATION);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toast Notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a temporary toast message.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
