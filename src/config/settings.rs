//! User settings and preferences for Markpad
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON configuration files, and the
//! `ViewMode` state machine that decides which panes are visible.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system preference
    #[default]
    System,
}

// ─────────────────────────────────────────────────────────────────────────────
// View Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are visible.
///
/// Three states only: activating one exclusive mode always leaves the other,
/// so "edit only" and "reader only" can never be active together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Editor and preview side by side
    #[default]
    Split,
    /// Editor centered, preview hidden
    EditOnly,
    /// Preview centered, editor hidden
    ReaderOnly,
}

/// How a single pane is laid out for a given `ViewMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLayout {
    /// Shares the window with the other pane
    Shared,
    /// Takes the whole window
    Full,
    /// Not shown (and not mounted)
    Hidden,
}

impl PaneLayout {
    /// Whether the pane is on screen.
    pub fn is_visible(&self) -> bool {
        !matches!(self, PaneLayout::Hidden)
    }
}

impl ViewMode {
    /// Edit-mode button pressed.
    ///
    /// Leaves `EditOnly` back to `Split`; from any other state (including
    /// `ReaderOnly`) switches straight to `EditOnly`.
    pub fn toggle_edit(self) -> Self {
        match self {
            ViewMode::EditOnly => ViewMode::Split,
            ViewMode::Split | ViewMode::ReaderOnly => ViewMode::EditOnly,
        }
    }

    /// Reader-mode button pressed. Mirror image of [`ViewMode::toggle_edit`].
    pub fn toggle_reader(self) -> Self {
        match self {
            ViewMode::ReaderOnly => ViewMode::Split,
            ViewMode::Split | ViewMode::EditOnly => ViewMode::ReaderOnly,
        }
    }

    /// Whether the edit-only flag is set.
    pub fn is_edit_mode(&self) -> bool {
        matches!(self, ViewMode::EditOnly)
    }

    /// Whether the reader-only flag is set.
    pub fn is_reader_mode(&self) -> bool {
        matches!(self, ViewMode::ReaderOnly)
    }

    /// Layout of the editor pane.
    pub fn editor_layout(&self) -> PaneLayout {
        match self {
            ViewMode::Split => PaneLayout::Shared,
            ViewMode::EditOnly => PaneLayout::Full,
            ViewMode::ReaderOnly => PaneLayout::Hidden,
        }
    }

    /// Layout of the preview pane.
    pub fn preview_layout(&self) -> PaneLayout {
        match self {
            ViewMode::Split => PaneLayout::Shared,
            ViewMode::EditOnly => PaneLayout::Hidden,
            ViewMode::ReaderOnly => PaneLayout::Full,
        }
    }

    /// Get a display label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Split => "Split",
            ViewMode::EditOnly => "Edit mode",
            ViewMode::ReaderOnly => "Reader mode",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How "Save as HTML" hands the file to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportStrategy {
    /// Native save prompt, falling back to `Download` when unavailable
    #[default]
    Prompt,
    /// Data-URI download straight into the downloads folder
    Download,
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Initial window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Whether to start maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences.
///
/// Read from the user's config directory at startup. All fields have
/// defaults via `#[serde(default)]`, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// View mode at startup
    pub view_mode: ViewMode,

    /// Font size for both panes (in points)
    pub font_size: f32,

    /// Editor share of the window width in split mode (0.2 to 0.8)
    pub split_ratio: f32,

    /// Window size at startup
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────
    /// Turn single newlines inside a paragraph into line breaks
    pub line_breaks: bool,

    /// Pass raw HTML in the document through to the output
    pub allow_raw_html: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Sync Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the editor and preview scroll together
    pub sync_scroll_enabled: bool,

    /// Quiet period before a mirrored pane listens to its own scrolling again
    pub scroll_debounce_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────
    /// How exported HTML is handed to the platform
    pub export_strategy: ExportStrategy,

    /// Wrap exported HTML in a complete, styled document
    pub export_standalone: bool,

    /// Whether to open exported files after export
    pub open_after_export: bool,

    /// Show a toast when opening or exporting a file fails
    pub report_file_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            font_size: 14.0,
            split_ratio: 0.5,
            window_size: WindowSize::default(),

            // Rendering
            line_breaks: true,
            allow_raw_html: false,

            // Sync Scrolling
            sync_scroll_enabled: true,
            scroll_debounce_ms: 66,

            // Files
            export_strategy: ExportStrategy::default(),
            export_standalone: false,
            open_after_export: false,
            report_file_errors: false,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum editor share in split mode.
    pub const MIN_SPLIT_RATIO: f32 = 0.2;
    /// Maximum editor share in split mode.
    pub const MAX_SPLIT_RATIO: f32 = 0.8;
    /// Minimum scroll debounce.
    pub const MIN_SCROLL_DEBOUNCE_MS: u64 = 1;
    /// Maximum scroll debounce.
    pub const MAX_SCROLL_DEBOUNCE_MS: u64 = 1000;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Config files are hand-edited, so anything may show up here.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        self.scroll_debounce_ms = self
            .scroll_debounce_ms
            .clamp(Self::MIN_SCROLL_DEBOUNCE_MS, Self::MAX_SCROLL_DEBOUNCE_MS);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Deserialize settings and sanitize them in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.view_mode, ViewMode::Split);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.line_breaks);
        assert!(!settings.allow_raw_html);
        assert!(settings.sync_scroll_enabled);
        assert_eq!(settings.scroll_debounce_ms, 66);
        assert_eq!(settings.export_strategy, ExportStrategy::Prompt);
        assert!(!settings.export_standalone);
        assert!(!settings.report_file_errors);
        assert_eq!(settings.window_size.width, 1200.0);
        assert_eq!(settings.window_size.height, 800.0);
    }

    #[test]
    fn test_view_mode_serialization() {
        assert_eq!(serde_json::to_string(&ViewMode::Split).unwrap(), "\"split\"");
        assert_eq!(
            serde_json::to_string(&ViewMode::EditOnly).unwrap(),
            "\"editonly\""
        );
        assert_eq!(
            serde_json::from_str::<ViewMode>("\"readeronly\"").unwrap(),
            ViewMode::ReaderOnly
        );
    }

    #[test]
    fn test_toggle_edit_transitions() {
        assert_eq!(ViewMode::Split.toggle_edit(), ViewMode::EditOnly);
        assert_eq!(ViewMode::EditOnly.toggle_edit(), ViewMode::Split);
        assert_eq!(ViewMode::ReaderOnly.toggle_edit(), ViewMode::EditOnly);
    }

    #[test]
    fn test_toggle_reader_transitions() {
        assert_eq!(ViewMode::Split.toggle_reader(), ViewMode::ReaderOnly);
        assert_eq!(ViewMode::ReaderOnly.toggle_reader(), ViewMode::Split);
        assert_eq!(ViewMode::EditOnly.toggle_reader(), ViewMode::ReaderOnly);
    }

    #[test]
    fn test_double_toggle_returns_to_split() {
        assert_eq!(ViewMode::Split.toggle_edit().toggle_edit(), ViewMode::Split);
        assert_eq!(
            ViewMode::Split.toggle_reader().toggle_reader(),
            ViewMode::Split
        );
    }

    #[test]
    fn test_inactive_toggle_switches_in_one_click() {
        let mode = ViewMode::Split.toggle_reader();
        assert!(mode.is_reader_mode());

        let mode = mode.toggle_edit();
        assert!(mode.is_edit_mode());
        assert!(!mode.is_reader_mode());
    }

    #[test]
    fn test_pane_layouts() {
        assert_eq!(ViewMode::Split.editor_layout(), PaneLayout::Shared);
        assert_eq!(ViewMode::Split.preview_layout(), PaneLayout::Shared);
        assert_eq!(ViewMode::EditOnly.editor_layout(), PaneLayout::Full);
        assert!(!ViewMode::EditOnly.preview_layout().is_visible());
        assert!(!ViewMode::ReaderOnly.editor_layout().is_visible());
        assert_eq!(ViewMode::ReaderOnly.preview_layout(), PaneLayout::Full);
    }

    #[test]
    fn test_exhaustive_short_sequences_never_set_both_flags() {
        // Every sequence of up to 10 presses, encoded as bits.
        for len in 0..=10u32 {
            for bits in 0..(1u32 << len) {
                let mut mode = ViewMode::Split;
                for i in 0..len {
                    mode = if bits & (1 << i) == 0 {
                        mode.toggle_edit()
                    } else {
                        mode.toggle_reader()
                    };
                    assert!(!(mode.is_edit_mode() && mode.is_reader_mode()));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_toggles_keep_modes_exclusive(presses in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut mode = ViewMode::Split;
            for edit in presses {
                mode = if edit { mode.toggle_edit() } else { mode.toggle_reader() };
                prop_assert!(!(mode.is_edit_mode() && mode.is_reader_mode()));
                // At least one pane is always on screen.
                prop_assert!(mode.editor_layout().is_visible() || mode.preview_layout().is_visible());
            }
        }
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings::default();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"theme": "dark", "view_mode": "readeronly"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.view_mode, ViewMode::ReaderOnly);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.scroll_debounce_ms, 66);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings::default();
        settings.font_size = 4.0;
        settings.split_ratio = 1.5;
        settings.scroll_debounce_ms = 0;
        settings.window_size.width = 10.0;
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
        assert_eq!(settings.scroll_debounce_ms, Settings::MIN_SCROLL_DEBOUNCE_MS);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"font_size": 100.0, "scroll_debounce_ms": 5000}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.scroll_debounce_ms, Settings::MAX_SCROLL_DEBOUNCE_MS);
    }
}
