//! Main application module for Markpad
//!
//! This module implements the eframe App trait: it lays out the top bar and
//! the two panes for the current view mode, feeds pane scroll offsets
//! through the sync-scroll state machine, and turns bar clicks, shortcuts
//! and dropped files into document operations.

use crate::config::{Settings, Theme, ViewMode};
use crate::editor::EditorPane;
use crate::export::copy_html_to_clipboard;
use crate::files::{DocumentIo, HostPlatform, NativeHost, OpenStatus, SaveReceipt, OPEN_EXTENSIONS};
use crate::markdown::{Converter, ConverterOptions, MarkdownDocument};
use crate::preview::{Pane, PreviewPane, ScrollResponse, SyncScrollState};
use crate::state::{AppState, TOAST_DURATION};
use crate::ui::{TopBar, TopBarAction};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application name shown in the window title.
const APP_NAME: &str = "Markpad";

/// Widest a single centered pane gets in edit-only or reader-only mode.
const CENTERED_PANE_MAX_WIDTH: f32 = 860.0;

/// How often to check on a background file read.
const OPEN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The main application struct that holds all state and implements eframe::App.
pub struct MarkpadApp {
    /// Central application state
    state: AppState,
    /// Scroll mirroring between editor and preview
    sync_scroll: SyncScrollState,
    /// Save/open operations
    document_io: DocumentIo,
    /// Markdown renderer
    converter: Converter,
    /// Preview tree for the current document version
    preview_cache: Option<(u64, MarkdownDocument)>,
    /// Last title sent to the window
    last_title: String,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl MarkpadApp {
    /// Create the app from loaded settings and apply the configured theme.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing {}", APP_NAME);

        match settings.theme {
            Theme::Light => cc.egui_ctx.set_visuals(egui::Visuals::light()),
            Theme::Dark => cc.egui_ctx.set_visuals(egui::Visuals::dark()),
            Theme::System => {}
        }

        Self::with_host(settings, Arc::new(NativeHost::new()))
    }

    fn with_host(settings: Settings, host: Arc<dyn HostPlatform>) -> Self {
        let converter = Converter::new(ConverterOptions::from_settings(&settings));

        let mut sync_scroll =
            SyncScrollState::new(Duration::from_millis(settings.scroll_debounce_ms));
        sync_scroll.set_enabled(settings.sync_scroll_enabled);

        let document_io = DocumentIo::new(host)
            .with_strategy(settings.export_strategy)
            .with_standalone(settings.export_standalone);

        Self {
            state: AppState::with_settings(settings),
            sync_scroll,
            document_io,
            converter,
            preview_cache: None,
            last_title: String::new(),
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn window_title(&self) -> String {
        format!("{} - {}", self.state.document.title(), APP_NAME)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context, now: Instant) -> Option<TopBarAction> {
        let view_mode = self.state.view_mode();
        let top_bar = TopBar::new(view_mode, self.sync_scroll.is_enabled());

        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| top_bar.show(ui))
            .inner;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.render_status_bar(ui));

        let editor_visible = view_mode.editor_layout().is_visible();
        let preview_visible = view_mode.preview_layout().is_visible();
        self.sync_scroll.set_mounted(Pane::Editor, editor_visible);
        self.sync_scroll.set_mounted(Pane::Preview, preview_visible);

        match view_mode {
            ViewMode::Split => {
                let width = ctx.available_rect().width() * self.state.settings.split_ratio;
                egui::SidePanel::left("editor_panel")
                    .resizable(true)
                    .default_width(width)
                    .show(ctx, |ui| self.show_editor(ui, now));
                egui::CentralPanel::default().show(ctx, |ui| self.show_preview(ui, now));
            }
            ViewMode::EditOnly => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    centered(ui, |ui| self.show_editor(ui, now));
                });
            }
            ViewMode::ReaderOnly => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    centered(ui, |ui| self.show_preview(ui, now));
                });
            }
        }

        action
    }

    fn show_editor(&mut self, ui: &mut egui::Ui, now: Instant) {
        let output = EditorPane::new(self.state.document.text(), self.state.document.generation())
            .font_size(self.state.settings.font_size)
            .scroll_to(self.sync_scroll.take_pending(Pane::Editor))
            .id(egui::Id::new("markpad_editor"))
            .show(ui);

        if let Some(text) = output.new_text {
            self.state.on_text_changed(text);
        }
        if output.cursor.is_some() {
            self.state.ui.cursor = output.cursor;
        }

        self.observe_scroll(ui.ctx(), Pane::Editor, output.scroll_offset, now);
    }

    fn show_preview(&mut self, ui: &mut egui::Ui, now: Instant) {
        let version = self.state.document.version();
        if self.preview_cache.as_ref().map(|(v, _)| *v) != Some(version) {
            let document = self.converter.parse(self.state.document.text());
            self.preview_cache = Some((version, document));
        }
        let Some((_, document)) = &self.preview_cache else {
            return;
        };

        let output = PreviewPane::new(document)
            .font_size(self.state.settings.font_size)
            .line_breaks(self.converter.options().line_breaks)
            .scroll_to(self.sync_scroll.take_pending(Pane::Preview))
            .id(egui::Id::new("markpad_preview"))
            .show(ui);

        self.observe_scroll(ui.ctx(), Pane::Preview, output.scroll_offset, now);
    }

    fn observe_scroll(&mut self, ctx: &egui::Context, pane: Pane, offset: f32, now: Instant) {
        if let ScrollResponse::Mirrored { target, offset } =
            self.sync_scroll.observe(pane, offset, now)
        {
            debug!("Sync scroll: {:?} -> {:?} at {:.1}", pane, target, offset);
            // The target pane picks up its pending offset on the next frame.
            ctx.request_repaint();
        }
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.state.view_mode().label());

            if let Some(toast) = &self.state.ui.toast_message {
                ui.with_layout(
                    egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                    |ui| {
                        ui.label(egui::RichText::new(toast).italics());
                    },
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text = self.state.document.text();
                ui.label(format!(
                    "{} words, {} chars",
                    text.split_whitespace().count(),
                    text.chars().count()
                ));

                if let Some((line, col)) = self.state.ui.cursor {
                    ui.separator();
                    ui.label(format!("Ln {}, Col {}", line + 1, col + 1));
                }
            });
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_action(&mut self, action: TopBarAction) {
        debug!("Action: {:?}", action);
        match action {
            TopBarAction::ToggleEditMode => {
                self.state.toggle_edit_mode();
            }
            TopBarAction::ToggleReaderMode => {
                self.state.toggle_reader_mode();
            }
            TopBarAction::SaveAsHtml => self.handle_save_as_html(),
            TopBarAction::OpenFromDisk => self.handle_open_from_disk(),
            TopBarAction::CopyHtml => self.handle_copy_as_html(),
            TopBarAction::ToggleSyncScroll => {
                let enabled = self.sync_scroll.toggle();
                let time = self.get_app_time();
                let message = if enabled {
                    "Sync scrolling on"
                } else {
                    "Sync scrolling off"
                };
                self.state.show_toast(message, time, 1.5);
            }
        }
    }

    fn handle_save_as_html(&mut self) {
        let result = self
            .document_io
            .save_as_html(self.state.document.text(), &self.converter);
        let time = self.get_app_time();

        match result {
            Ok(SaveReceipt::Saved(path)) => {
                self.state
                    .show_toast(format!("Exported to {}", path.display()), time, 2.5);

                if self.state.settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open exported file: {}", e);
                    }
                }
            }
            Ok(SaveReceipt::Cancelled) => debug!("Export cancelled"),
            Err(e) => self.state.report_file_error("Export failed", &e, time),
        }
    }

    fn handle_open_from_disk(&mut self) {
        match self.document_io.open_from_disk() {
            OpenStatus::Reading => {}
            OpenStatus::Cancelled => debug!("Open cancelled, document unchanged"),
            OpenStatus::Busy => debug!("Open ignored, a file is still loading"),
        }
    }

    fn handle_copy_as_html(&mut self) {
        let time = self.get_app_time();
        match copy_html_to_clipboard(self.state.document.text(), &self.converter) {
            Ok(()) => {
                info!("Copied HTML to clipboard");
                self.state.show_toast("HTML copied to clipboard", time, 2.0);
            }
            Err(e) => {
                warn!("Failed to copy HTML to clipboard: {}", e);
                self.state
                    .show_toast(format!("Copy failed: {}", e), time, TOAST_DURATION);
            }
        }
    }

    /// Apply a finished background read, if one arrived.
    fn poll_open(&mut self, ctx: &egui::Context) {
        if let Some(outcome) = self.document_io.poll_open() {
            let time = self.get_app_time();
            self.state.apply_load_outcome(outcome, time);
        } else if self.document_io.has_open_picker() {
            ctx.request_repaint_after(OPEN_POLL_INTERVAL);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        // Only one document at a time: the first openable file wins.
        let Some(path) = dropped.into_iter().find(|p| is_openable(p)) else {
            return;
        };

        if self.document_io.open_path(path) == OpenStatus::Busy {
            debug!("Dropped file ignored, a file is still loading");
        }
    }

    fn handle_keyboard_shortcuts(&self, ctx: &egui::Context) -> Option<TopBarAction> {
        ctx.input(|i| {
            if !i.modifiers.ctrl {
                return None;
            }

            // Ctrl+Shift+E: Save as HTML
            if i.modifiers.shift && i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+Shift+E (Save as HTML)");
                return Some(TopBarAction::SaveAsHtml);
            }

            // Ctrl+Shift+C: Copy as HTML
            if i.modifiers.shift && i.key_pressed(egui::Key::C) {
                debug!("Keyboard shortcut: Ctrl+Shift+C (Copy as HTML)");
                return Some(TopBarAction::CopyHtml);
            }

            // Ctrl+E: Edit mode
            if !i.modifiers.shift && i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Edit mode)");
                return Some(TopBarAction::ToggleEditMode);
            }

            // Ctrl+R: Reader mode
            if !i.modifiers.shift && i.key_pressed(egui::Key::R) {
                debug!("Keyboard shortcut: Ctrl+R (Reader mode)");
                return Some(TopBarAction::ToggleReaderMode);
            }

            // Ctrl+O: Open
            if i.key_pressed(egui::Key::O) {
                debug!("Keyboard shortcut: Ctrl+O (Open)");
                return Some(TopBarAction::OpenFromDisk);
            }

            None
        })
    }
}

impl eframe::App for MarkpadApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Re-attach scroll listeners whose debounce expired
        if let Some(wait) = self.sync_scroll.tick(now) {
            ctx.request_repaint_after(wait);
        }

        // Update toast message (clear if expired)
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);
        if let Some(expires_at) = self.state.ui.toast_expires_at {
            ctx.request_repaint_after(Duration::from_secs_f64(
                (expires_at - current_time).max(0.0),
            ));
        }

        self.handle_dropped_files(ctx);
        self.poll_open(ctx);

        let title = self.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }

        let clicked = self.render_ui(ctx, now);
        let shortcut = self.handle_keyboard_shortcuts(ctx);

        for action in [clicked, shortcut].into_iter().flatten() {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a dropped path is something "Open from disk" would accept.
fn is_openable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            OPEN_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Show `add_contents` in a column centered in the available width.
fn centered(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    let side = ((ui.available_width() - CENTERED_PANE_MAX_WIDTH) / 2.0).max(0.0);
    egui::Frame::none()
        .inner_margin(egui::Margin::symmetric(side, 0.0))
        .show(ui, add_contents);
}
