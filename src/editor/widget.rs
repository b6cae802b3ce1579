//! Text editor pane for Markpad
//!
//! This module implements the editor pane using egui's TextEdit inside a
//! vertical ScrollArea. The pane edits a copy of the document and hands
//! any change back to the caller instead of mutating state itself.

use egui::{self, FontId, ScrollArea, TextEdit, Ui};
use log::debug;

/// Result of showing the editor pane.
pub struct EditorOutput {
    /// The edited text, if the user changed anything this frame.
    pub new_text: Option<String>,
    /// Vertical scroll offset after this frame.
    pub scroll_offset: f32,
    /// Caret position as 0-indexed (line, column), if the editor has focus.
    pub cursor: Option<(usize, usize)>,
}

/// A monospace markdown editor.
///
/// # Example
///
/// ```ignore
/// let output = EditorPane::new(doc.text(), doc.generation())
///     .font_size(settings.font_size)
///     .scroll_to(sync.take_pending(Pane::Editor))
///     .show(ui);
/// if let Some(text) = output.new_text {
///     state.on_text_changed(text);
/// }
/// ```
pub struct EditorPane<'a> {
    /// Current document text.
    text: &'a str,
    /// Bumped when the text is replaced wholesale; resets the cursor state.
    generation: u64,
    /// Font size for the editor.
    font_size: f32,
    /// Scroll offset to force this frame.
    scroll_to: Option<f32>,
    /// ID for the editor (for state persistence).
    id: Option<egui::Id>,
}

impl<'a> EditorPane<'a> {
    /// Create a new editor pane for the given text.
    pub fn new(text: &'a str, generation: u64) -> Self {
        Self {
            text,
            generation,
            font_size: 14.0,
            scroll_to: None,
            id: None,
        }
    }

    /// Set the font size for the editor.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Force the scroll offset this frame (mirrored from the preview).
    #[must_use]
    pub fn scroll_to(mut self, offset: Option<f32>) -> Self {
        self.scroll_to = offset;
        self
    }

    /// Set a custom ID for the editor.
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor pane and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let base_id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        // Stable while typing; a loaded file gets a fresh id and cursor.
        let text_id = base_id.with(self.generation);

        let mut buffer = self.text.to_owned();
        let font_size = self.font_size;

        let mut scroll_area = ScrollArea::vertical()
            .id_source(base_id.with("scroll"))
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let scroll_output = scroll_area.show(ui, |ui| {
            let min_size = ui.available_size();
            TextEdit::multiline(&mut buffer)
                .id(text_id)
                .code_editor()
                .font(FontId::monospace(font_size))
                .frame(false)
                .desired_width(f32::INFINITY)
                .min_size(min_size)
                .hint_text("Type some markdown here")
                .show(ui)
        });

        let text_output = scroll_output.inner;
        let changed = text_output.response.changed();

        let cursor = text_output
            .cursor_range
            .map(|range| char_index_to_line_col(&buffer, range.primary.ccursor.index));

        let new_text = if changed {
            debug!("Editor content changed ({} bytes)", buffer.len());
            Some(buffer)
        } else {
            None
        };

        EditorOutput {
            new_text,
            scroll_offset: scroll_output.state.offset.y,
            cursor,
        }
    }
}

/// Convert a character index to (line, column) position.
///
/// Both line and column are 0-indexed.
fn char_index_to_line_col(text: &str, char_index: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;

    for (i, ch) in text.chars().enumerate() {
        if i >= char_index {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    (line, col)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
