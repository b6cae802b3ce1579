//! Top bar for Markpad
//!
//! A single row holding the app title, the two view-mode toggles and the
//! document actions. The bar only reports what was clicked; the app decides
//! what happens.

use crate::config::ViewMode;
use egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the bar.
const TOP_BAR_HEIGHT: f32 = 36.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the top bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    /// Show only the editor, or go back to split
    ToggleEditMode,
    /// Show only the preview, or go back to split
    ToggleReaderMode,
    /// Export the rendered document as `export.html`
    SaveAsHtml,
    /// Replace the document with a `.md`/`.txt` file
    OpenFromDisk,
    /// Copy rendered HTML to clipboard
    CopyHtml,
    /// Toggle sync scrolling between the panes
    ToggleSyncScroll,
}

/// Top bar rendering.
#[derive(Debug, Clone, Copy)]
pub struct TopBar {
    view_mode: ViewMode,
    sync_scroll_enabled: bool,
}

impl TopBar {
    pub fn new(view_mode: ViewMode, sync_scroll_enabled: bool) -> Self {
        Self {
            view_mode,
            sync_scroll_enabled,
        }
    }

    /// Render the bar and return any triggered action.
    pub fn show(self, ui: &mut Ui) -> Option<TopBarAction> {
        let mut action = None;
        let is_dark = ui.visuals().dark_mode;
        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };

        ui.horizontal(|ui| {
            ui.set_height(TOP_BAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 2.0;

            ui.add_space(6.0);
            ui.label(RichText::new("Markpad").size(15.0).strong());
            ui.add_space(8.0);
            vertical_separator(ui, separator_color, TOP_BAR_HEIGHT - 10.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // View Group
            // ═══════════════════════════════════════════════════════════════════
            if toggle_button(
                ui,
                "Edit mode",
                "Show only the editor (Ctrl+E)",
                self.view_mode.is_edit_mode(),
                is_dark,
            )
            .clicked()
            {
                action = Some(TopBarAction::ToggleEditMode);
            }

            if toggle_button(
                ui,
                "Reader mode",
                "Show only the preview (Ctrl+R)",
                self.view_mode.is_reader_mode(),
                is_dark,
            )
            .clicked()
            {
                action = Some(TopBarAction::ToggleReaderMode);
            }

            // Sync scroll only matters when both panes are on screen
            let sync_tooltip = if self.sync_scroll_enabled {
                "Disable sync scrolling"
            } else {
                "Enable sync scrolling"
            };
            if self.view_mode == ViewMode::Split
                && toggle_button(ui, "⇅", sync_tooltip, self.sync_scroll_enabled, is_dark).clicked()
            {
                action = Some(TopBarAction::ToggleSyncScroll);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, TOP_BAR_HEIGHT - 10.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // File Group
            // ═══════════════════════════════════════════════════════════════════
            if icon_button(ui, "📂", "Open from disk (Ctrl+O)", is_dark).clicked() {
                action = Some(TopBarAction::OpenFromDisk);
            }

            if icon_button(ui, "🌐", "Save as HTML (Ctrl+Shift+E)", is_dark).clicked() {
                action = Some(TopBarAction::SaveAsHtml);
            }

            if icon_button(ui, "📋", "Copy as HTML (Ctrl+Shift+C)", is_dark).clicked() {
                action = Some(TopBarAction::CopyHtml);
            }
        });

        // Bottom border
        let rect = ui.min_rect();
        ui.painter().line_segment(
            [
                egui::pos2(rect.min.x, rect.max.y),
                egui::pos2(rect.max.x, rect.max.y),
            ],
            egui::Stroke::new(1.0, separator_color),
        );

        action
    }
}

/// Render an icon button with consistent styling.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, is_dark: bool) -> Response {
    let text_color = if is_dark {
        Color32::from_rgb(220, 220, 220)
    } else {
        Color32::from_rgb(50, 50, 50)
    };

    let btn = ui.add(
        egui::Button::new(RichText::new(icon).size(16.0).color(text_color))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() {
        let hover_bg = if is_dark {
            Color32::from_rgb(60, 60, 60)
        } else {
            Color32::from_rgb(220, 220, 220)
        };
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
        ui.painter().text(
            btn.rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(16.0),
            text_color,
        );
    }

    btn.on_hover_text(tooltip)
}

/// Render a text button that stays highlighted while `active`.
fn toggle_button(ui: &mut Ui, label: &str, tooltip: &str, active: bool, is_dark: bool) -> Response {
    let text_color = if is_dark {
        Color32::from_rgb(220, 220, 220)
    } else {
        Color32::from_rgb(50, 50, 50)
    };

    let fill = if active {
        if is_dark {
            Color32::from_rgb(70, 90, 120)
        } else {
            Color32::from_rgb(200, 220, 240)
        }
    } else {
        Color32::TRANSPARENT
    };

    let btn = ui.add(
        egui::Button::new(RichText::new(label).size(13.0).color(text_color))
            .fill(fill)
            .frame(active)
            .min_size(Vec2::new(0.0, ICON_BUTTON_SIZE.y)),
    );

    btn.on_hover_text(tooltip)
}

/// Draw a vertical separator line.
fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}
