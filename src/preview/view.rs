//! Rendered preview pane
//!
//! Draws a parsed [`MarkdownDocument`] with native egui widgets inside its
//! own vertical scroll area. Every hyperlink opens in a new browser tab.

use crate::markdown::{
    HeadingLevel, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType,
};
use egui::{self, RichText, ScrollArea, Stroke, Ui};

/// Result of showing the preview pane.
pub struct PreviewOutput {
    /// Vertical scroll offset after this frame.
    pub scroll_offset: f32,
}

/// The preview pane widget.
///
/// # Example
///
/// ```ignore
/// let output = PreviewPane::new(&doc)
///     .font_size(settings.font_size)
///     .line_breaks(true)
///     .scroll_to(sync.take_pending(Pane::Preview))
///     .show(ui);
/// ```
pub struct PreviewPane<'a> {
    doc: &'a MarkdownDocument,
    font_size: f32,
    line_breaks: bool,
    scroll_to: Option<f32>,
    id: Option<egui::Id>,
}

impl<'a> PreviewPane<'a> {
    pub fn new(doc: &'a MarkdownDocument) -> Self {
        Self {
            doc,
            font_size: 14.0,
            line_breaks: true,
            scroll_to: None,
            id: None,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Whether soft breaks inside a paragraph start a new line.
    #[must_use]
    pub fn line_breaks(mut self, enabled: bool) -> Self {
        self.line_breaks = enabled;
        self
    }

    /// Force the scroll offset this frame (mirrored from the editor).
    #[must_use]
    pub fn scroll_to(mut self, offset: Option<f32>) -> Self {
        self.scroll_to = offset;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn show(self, ui: &mut Ui) -> PreviewOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("preview"));

        let mut scroll_area = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let mut renderer = BlockRenderer {
            id,
            font_size: self.font_size,
            line_breaks: self.line_breaks,
            table_count: 0,
        };

        let output = scroll_area.show(ui, |ui| {
            egui::Frame::none().inner_margin(12.0).show(ui, |ui| {
                ui.set_width(ui.available_width());
                renderer.render_children(ui, &self.doc.root);
            });
        });

        PreviewOutput {
            scroll_offset: output.state.offset.y,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Flattening
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InlineStyle {
    strong: bool,
    italics: bool,
    strike: bool,
    code: bool,
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq)]
struct InlineRun {
    text: String,
    style: InlineStyle,
    link: Option<String>,
}

/// Flatten inline nodes into visual lines of styled runs.
fn inline_lines(nodes: &[MarkdownNode], line_breaks: bool) -> Vec<Vec<InlineRun>> {
    let mut lines = vec![Vec::new()];
    for node in nodes {
        flatten_inline(node, InlineStyle::default(), None, line_breaks, &mut lines);
    }
    if lines.last().is_some_and(|line| line.is_empty()) && lines.len() > 1 {
        lines.pop();
    }
    lines
}

fn push_run(lines: &mut Vec<Vec<InlineRun>>, text: &str, style: InlineStyle, link: Option<&str>) {
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(InlineRun {
            text: text.to_string(),
            style,
            link: link.map(str::to_string),
        });
    }
}

fn flatten_inline(
    node: &MarkdownNode,
    style: InlineStyle,
    link: Option<&str>,
    line_breaks: bool,
    lines: &mut Vec<Vec<InlineRun>>,
) {
    let mut child_style = style;
    let mut child_link = link;

    match &node.node_type {
        MarkdownNodeType::Text(text) | MarkdownNodeType::HtmlInline(text) => {
            push_run(lines, text, style, link);
            return;
        }
        MarkdownNodeType::Code(code) => {
            push_run(lines, code, InlineStyle { code: true, ..style }, link);
            return;
        }
        MarkdownNodeType::SoftBreak if !line_breaks => {
            push_run(lines, " ", style, link);
            return;
        }
        MarkdownNodeType::SoftBreak | MarkdownNodeType::LineBreak => {
            lines.push(Vec::new());
            return;
        }
        MarkdownNodeType::Image { url, .. } => {
            // Images are shown as a link to their source
            let alt = node.text_content();
            let label = if alt.is_empty() { url.as_str() } else { alt.as_str() };
            push_run(lines, label, style, Some(url.as_str()));
            return;
        }
        MarkdownNodeType::Strong => child_style.strong = true,
        MarkdownNodeType::Emphasis => child_style.italics = true,
        MarkdownNodeType::Strikethrough => child_style.strike = true,
        MarkdownNodeType::Link { url, .. } => child_link = Some(url.as_str()),
        _ => {}
    }

    for child in &node.children {
        flatten_inline(child, child_style, child_link, line_breaks, lines);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn heading_scale(level: HeadingLevel) -> f32 {
    match level {
        HeadingLevel::H1 => 2.0,
        HeadingLevel::H2 => 1.6,
        HeadingLevel::H3 => 1.3,
        HeadingLevel::H4 => 1.15,
        HeadingLevel::H5 | HeadingLevel::H6 => 1.0,
    }
}

struct BlockRenderer {
    id: egui::Id,
    font_size: f32,
    line_breaks: bool,
    /// Tables drawn so far this frame, for unique grid ids
    table_count: usize,
}

impl BlockRenderer {
    fn render_children(&mut self, ui: &mut Ui, node: &MarkdownNode) {
        for child in &node.children {
            self.render_block(ui, child);
        }
    }

    fn render_block(&mut self, ui: &mut Ui, node: &MarkdownNode) {
        match &node.node_type {
            MarkdownNodeType::Paragraph => {
                self.render_inlines(ui, &node.children, self.font_size, false);
                ui.add_space(self.font_size * 0.5);
            }
            MarkdownNodeType::Heading { level } => {
                ui.add_space(self.font_size * 0.4);
                let size = self.font_size * heading_scale(*level);
                self.render_inlines(ui, &node.children, size, true);
                if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                    ui.separator();
                }
                ui.add_space(self.font_size * 0.3);
            }
            MarkdownNodeType::BlockQuote => {
                let bar = ui.visuals().widgets.noninteractive.bg_stroke.color;
                let response = egui::Frame::none()
                    .inner_margin(egui::Margin {
                        left: 12.0,
                        right: 4.0,
                        top: 2.0,
                        bottom: 2.0,
                    })
                    .show(ui, |ui| {
                        let quote_color = ui.visuals().weak_text_color();
                        ui.style_mut().visuals.override_text_color = Some(quote_color);
                        self.render_children(ui, node);
                    })
                    .response;
                let rect = response.rect;
                ui.painter()
                    .line_segment([rect.left_top(), rect.left_bottom()], Stroke::new(3.0, bar));
                ui.add_space(self.font_size * 0.5);
            }
            MarkdownNodeType::List { list_type, .. } => {
                self.render_list(ui, node, *list_type);
                ui.add_space(self.font_size * 0.3);
            }
            MarkdownNodeType::CodeBlock { literal, .. } => {
                egui::Frame::none()
                    .fill(ui.visuals().extreme_bg_color)
                    .rounding(4.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new(literal.trim_end_matches('\n'))
                                .monospace()
                                .size(self.font_size),
                        );
                    });
                ui.add_space(self.font_size * 0.5);
            }
            MarkdownNodeType::HtmlBlock(html) => {
                ui.label(RichText::new(html.trim_end()).monospace().weak());
            }
            MarkdownNodeType::ThematicBreak => {
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(4.0);
            }
            MarkdownNodeType::Table { .. } => {
                self.render_table(ui, node);
                ui.add_space(self.font_size * 0.5);
            }
            _ => self.render_children(ui, node),
        }
    }

    fn render_list(&mut self, ui: &mut Ui, list: &MarkdownNode, list_type: ListType) {
        for (index, item) in list.children.iter().enumerate() {
            ui.horizontal_top(|ui| {
                match (&item.node_type, list_type) {
                    (MarkdownNodeType::TaskItem { checked }, _) => {
                        let mut checked = *checked;
                        ui.add_enabled(false, egui::Checkbox::without_text(&mut checked));
                    }
                    (_, ListType::Ordered { start, delimiter }) => {
                        let number = start as usize + index;
                        ui.label(
                            RichText::new(format!("{}{}", number, delimiter)).size(self.font_size),
                        );
                    }
                    (_, ListType::Bullet) => {
                        ui.label(RichText::new("•").size(self.font_size));
                    }
                }
                ui.vertical(|ui| self.render_children(ui, item));
            });
        }
    }

    fn render_table(&mut self, ui: &mut Ui, table: &MarkdownNode) {
        self.table_count += 1;
        let grid_id = self.id.with(("table", self.table_count));

        egui::Frame::none()
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .inner_margin(6.0)
            .show(ui, |ui| {
                egui::Grid::new(grid_id)
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for row in &table.children {
                            let header =
                                matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
                            for cell in &row.children {
                                self.render_inlines(ui, &cell.children, self.font_size, header);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn render_inlines(&self, ui: &mut Ui, nodes: &[MarkdownNode], size: f32, strong: bool) {
        let lines = inline_lines(nodes, self.line_breaks);
        ui.vertical(|ui| {
            for line in &lines {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    if line.is_empty() {
                        // Keep the height of an empty line
                        ui.label(RichText::new(" ").size(size));
                    }
                    for run in line {
                        self.render_run(ui, run, size, strong);
                    }
                });
            }
        });
    }

    fn render_run(&self, ui: &mut Ui, run: &InlineRun, size: f32, strong: bool) {
        let mut text = RichText::new(&run.text).size(size);
        if run.style.strong || strong {
            text = text.strong();
        }
        if run.style.italics {
            text = text.italics();
        }
        if run.style.strike {
            text = text.strikethrough();
        }
        if run.style.code {
            text = text.code();
        }

        match &run.link {
            Some(url) => {
                let link_color = ui.visuals().hyperlink_color;
                ui.add(
                    egui::Hyperlink::from_label_and_url(text.color(link_color), url)
                        .open_in_new_tab(true),
                )
                .on_hover_text(url);
            }
            None => {
                ui.label(text);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
