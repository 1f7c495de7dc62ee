//! Rendering of documents to Markdown, structured elements and JSON.

mod elements;
mod json;
mod markdown;
mod options;

pub use elements::{
    map_elements, map_item, map_items, ElementMetadata, ElementType, StructuredElement,
};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{ExportOptions, FigureOptions};
