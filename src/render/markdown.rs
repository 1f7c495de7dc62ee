//! Whole-document Markdown rendering.

use crate::export::tables::to_markdown_table;
use crate::model::{Document, Item};

/// Convert a document to Markdown, in document order.
///
/// Headings become `#` runs one deeper than their level, list items are
/// bulleted, tables are rendered as pipe tables and pictures leave an
/// `<!-- image -->` marker. Blocks are separated by a blank line.
pub fn to_markdown(doc: &Document) -> String {
    let renderer = MarkdownRenderer::new();
    renderer.render(doc)
}

/// Markdown renderer.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Escape underscores in body text
    pub escape_underscores: bool,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new() -> Self {
        Self {
            escape_underscores: true,
            max_heading_level: 6,
        }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> String {
        let blocks: Vec<String> = doc
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| self.render_item(index, item))
            .collect();
        blocks.join("\n\n")
    }

    fn render_item(&self, index: usize, item: &Item) -> Option<String> {
        match item {
            Item::SectionHeader(h) => {
                let level = (h.level.saturating_add(1)).clamp(1, self.max_heading_level.clamp(1, 6));
                Some(format!("{} {}", "#".repeat(level as usize), self.escape(&h.text)))
            }
            Item::ListItem(l) => Some(format!("- {}", self.escape(&l.text))),
            Item::Text(t) => {
                if t.text.trim().is_empty() {
                    None
                } else {
                    Some(self.escape(&t.text))
                }
            }
            Item::Table(t) => {
                let rendered = t.table.grid().and_then(|grid| to_markdown_table(&grid));
                match rendered {
                    Ok(table) => Some(match t.table.caption {
                        Some(ref caption) => format!("{}\n\n{}", self.escape(caption), table),
                        None => table,
                    }),
                    Err(e) => {
                        log::warn!("Table #{} rendered as placeholder: {}", index, e);
                        let page = item.page_no().map(|p| p.to_string()).unwrap_or_default();
                        Some(format!("[TABLE ON PAGE {}]", page))
                    }
                }
            }
            Item::Picture(p) => Some(match p.caption {
                Some(ref caption) => format!("{}\n\n<!-- image -->", self.escape(caption)),
                None => "<!-- image -->".to_string(),
            }),
        }
    }

    fn escape(&self, text: &str) -> String {
        if self.escape_underscores {
            escape_underscores(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape underscores outside inline code spans.
fn escape_underscores(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_code = false;
    for c in text.chars() {
        match c {
            '`' => {
                in_code = !in_code;
                result.push(c);
            }
            '_' if !in_code => result.push_str("\\_"),
            _ => result.push(c),
        }
    }
    result
}
