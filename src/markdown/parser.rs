//! Markdown parser implementation using comrak
//!
//! Converts comrak's arena-allocated AST into an owned tree the preview
//! pane can keep between frames.

use comrak::{
    nodes::{
        AstNode, ListDelimType, ListType as ComrakListType, NodeValue,
        TableAlignment as ComrakTableAlignment,
    },
    parse_document, Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Heading level (H1-H6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl From<u8> for HeadingLevel {
    fn from(level: u8) -> Self {
        match level {
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            _ => HeadingLevel::H6,
        }
    }
}

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered { start: u32, delimiter: char },
}

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Represents the type of a markdown node.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    /// Root document node
    Document,
    /// Block quote (>)
    BlockQuote,
    /// List container
    List { list_type: ListType, tight: bool },
    /// List item
    Item,
    /// Task list item
    TaskItem { checked: bool },
    /// Fenced or indented code block
    CodeBlock { info: String, literal: String },
    /// HTML block (dropped while parsing unless raw HTML is allowed)
    HtmlBlock(String),
    /// Paragraph
    Paragraph,
    /// Heading (H1-H6)
    Heading { level: HeadingLevel },
    /// Thematic break (horizontal rule)
    ThematicBreak,
    /// Table
    Table { alignments: Vec<TableAlignment> },
    /// Table row
    TableRow { header: bool },
    /// Table cell
    TableCell,
    /// Inline text content
    Text(String),
    /// Soft line break
    SoftBreak,
    /// Hard line break
    LineBreak,
    /// Inline code
    Code(String),
    /// Inline HTML (dropped while parsing unless raw HTML is allowed)
    HtmlInline(String),
    /// Emphasis (italic)
    Emphasis,
    /// Strong emphasis (bold)
    Strong,
    /// Strikethrough
    Strikethrough,
    /// Link
    Link { url: String, title: String },
    /// Image
    Image { url: String, title: String },
}

/// A node in the markdown AST with position information.
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    /// The type of this node
    pub node_type: MarkdownNodeType,
    /// Child nodes
    pub children: Vec<MarkdownNode>,
    /// Start line in source (1-indexed)
    pub start_line: usize,
}

impl MarkdownNode {
    fn new(node_type: MarkdownNodeType, start_line: usize) -> Self {
        Self {
            node_type,
            children: Vec::new(),
            start_line,
        }
    }

    /// Get all text content from this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) => output.push_str(t),
            MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }

    fn collect_links(&self, output: &mut Vec<String>) {
        if let MarkdownNodeType::Link { url, .. } = &self.node_type {
            output.push(url.clone());
        }
        for child in &self.children {
            child.collect_links(output);
        }
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    /// Root node of the AST
    pub root: MarkdownNode,
}

impl MarkdownDocument {
    /// Link destinations in document order.
    pub fn links(&self) -> Vec<String> {
        let mut links = Vec::new();
        self.root.collect_links(&mut links);
        links
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into an owned tree.
///
/// comrak accepts any input, so there is no error path. Raw HTML nodes are
/// kept only when `options.render.unsafe_` is set, matching what the HTML
/// renderer emits.
pub fn parse_markdown(markdown: &str, options: &Options) -> MarkdownDocument {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, options);

    MarkdownDocument {
        root: convert_node(root, options.render.unsafe_),
    }
}

fn is_raw_html(node: &AstNode<'_>) -> bool {
    matches!(
        node.data.borrow().value,
        NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_)
    )
}

/// Convert a comrak AST node to our MarkdownNode structure.
fn convert_node<'a>(node: &'a AstNode<'a>, keep_raw_html: bool) -> MarkdownNode {
    let ast = node.data.borrow();
    let mut markdown_node =
        MarkdownNode::new(convert_node_value(&ast.value), ast.sourcepos.start.line);

    for child in node.children() {
        if !keep_raw_html && is_raw_html(child) {
            continue;
        }
        markdown_node.children.push(convert_node(child, keep_raw_html));
    }

    markdown_node
}

/// Convert a comrak NodeValue to our MarkdownNodeType.
fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet,
                ComrakListType::Ordered => ListType::Ordered {
                    start: list.start as u32,
                    delimiter: if list.delimiter == ListDelimType::Period {
                        '.'
                    } else {
                        ')'
                    },
                },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: HeadingLevel::from(heading.level),
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table
                .alignments
                .iter()
                .map(|a| TableAlignment::from(*a))
                .collect(),
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
            title: image.title.clone(),
        },
        // Extensions we never enable
        _ => MarkdownNodeType::Text(String::new()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ConverterOptions;

    fn parse(markdown: &str) -> MarkdownDocument {
        parse_markdown(markdown, &ConverterOptions::default().to_comrak_options())
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("");
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let doc = parse("Hello, world!");
        assert_eq!(doc.root.children.len(), 1);
        assert!(matches!(
            doc.root.children[0].node_type,
            MarkdownNodeType::Paragraph
        ));
    }

    #[test]
    fn test_parse_heading_levels() {
        let doc = parse("# One\n\n## Two");
        let levels: Vec<_> = doc
            .root
            .children
            .iter()
            .filter_map(|n| match n.node_type {
                MarkdownNodeType::Heading { level } => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![HeadingLevel::H1, HeadingLevel::H2]);
    }

    #[test]
    fn test_soft_break_preserved_in_tree() {
        let doc = parse("line1\nline2");
        let para = &doc.root.children[0];
        assert!(para
            .children
            .iter()
            .any(|c| matches!(c.node_type, MarkdownNodeType::SoftBreak)));
    }

    #[test]
    fn test_parse_ordered_list() {
        let doc = parse("3. Third\n4. Fourth");
        let list = &doc.root.children[0];
        match &list.node_type {
            MarkdownNodeType::List {
                list_type: ListType::Ordered { start, delimiter },
                ..
            } => {
                assert_eq!(*start, 3);
                assert_eq!(*delimiter, '.');
            }
            other => panic!("Expected ordered list, got {:?}", other),
        }
        assert_eq!(list.children.len(), 2);
    }

    #[test]
    fn test_parse_task_list() {
        let doc = parse("- [ ] Unchecked\n- [x] Checked");
        let list = &doc.root.children[0];
        let checked: Vec<_> = list
            .children
            .iter()
            .map(|item| match item.node_type {
                MarkdownNodeType::TaskItem { checked } => checked,
                _ => panic!("Expected task item, got {:?}", item.node_type),
            })
            .collect();
        assert_eq!(checked, vec![false, true]);
    }

    #[test]
    fn test_parse_bold_text_ast_structure() {
        let doc = parse("This is **bold** text");
        let para = &doc.root.children[0];
        let strong = para
            .children
            .iter()
            .find(|c| matches!(c.node_type, MarkdownNodeType::Strong))
            .expect("paragraph should contain a Strong node");
        assert_eq!(strong.text_content(), "bold");
    }

    #[test]
    fn test_parse_table_with_alignment() {
        let doc = parse("| Left | Center | Right |\n|:-----|:------:|------:|\n| L | C | R |");
        let table = doc
            .root
            .children
            .iter()
            .find(|n| matches!(n.node_type, MarkdownNodeType::Table { .. }))
            .expect("table node");

        if let MarkdownNodeType::Table { alignments } = &table.node_type {
            assert_eq!(
                alignments,
                &vec![
                    TableAlignment::Left,
                    TableAlignment::Center,
                    TableAlignment::Right
                ]
            );
        }
        assert!(matches!(
            table.children[0].node_type,
            MarkdownNodeType::TableRow { header: true }
        ));
    }

    #[test]
    fn test_parse_code_block() {
        let doc = parse("```rust\nfn main() {}\n```");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::CodeBlock { info, literal } => {
                assert_eq!(info, "rust");
                assert_eq!(literal, "fn main() {}\n");
            }
            other => panic!("Expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_links_in_document_order() {
        let doc = parse("[a](/first) then <https://second.example>");
        assert_eq!(
            doc.links(),
            vec!["/first".to_string(), "https://second.example".to_string()]
        );
    }

    #[test]
    fn test_parse_malformed_markdown() {
        let inputs = [
            "# Unclosed heading",
            "```\nunclosed code block",
            "| broken | table",
            "[unclosed link(",
            "![broken image",
            "***nested emphasis**",
        ];

        for input in inputs {
            let doc = parse(input);
            assert!(matches!(doc.root.node_type, MarkdownNodeType::Document));
        }
    }

    #[test]
    fn test_source_position() {
        let doc = parse("# Heading\n\nParagraph");
        assert_eq!(doc.root.children[0].start_line, 1);
        assert_eq!(doc.root.children[1].start_line, 3);
    }

    #[test]
    fn test_raw_html_dropped_by_default() {
        let doc = parse("<div>secret</div>\n\ntext <span>x</span>");

        assert_eq!(doc.root.children.len(), 1);
        let paragraph = &doc.root.children[0];
        assert!(matches!(paragraph.node_type, MarkdownNodeType::Paragraph));
        assert!(!paragraph
            .children
            .iter()
            .any(|n| matches!(n.node_type, MarkdownNodeType::HtmlInline(_))));
        assert_eq!(paragraph.text_content(), "text x");
    }

    #[test]
    fn test_raw_html_kept_when_allowed() {
        let options = ConverterOptions {
            allow_raw_html: true,
            ..ConverterOptions::default()
        };
        let doc = parse_markdown(
            "<div>secret</div>\n\ntext <span>x</span>",
            &options.to_comrak_options(),
        );

        assert!(matches!(
            doc.root.children[0].node_type,
            MarkdownNodeType::HtmlBlock(_)
        ));
        assert!(doc.root.children[1]
            .children
            .iter()
            .any(|n| matches!(n.node_type, MarkdownNodeType::HtmlInline(_))));
    }
}
