//! Mapping of document items to structured elements.
//!
//! Structured elements are the flat records handed to downstream indexing.
//! Their JSON shape follows the Unstructured element schema:
//!
//! ```json
//! {"type": "Title", "element_id": "…", "text": "Intro",
//!  "metadata": {"page_number": 1}}
//! ```
//!
//! Plain body text uses that schema's `UncategorizedText` category.

use crate::error::Result;
use crate::export::tables::to_csv;
use crate::model::{Document, Item};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Element taxonomy of the structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    /// Body text
    #[serde(rename = "UncategorizedText")]
    Text,
    /// Section heading
    Title,
    /// List entry
    ListItem,
    /// Table, with CSV text and HTML metadata
    Table,
}

impl ElementType {
    /// Name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "UncategorizedText",
            ElementType::Title => "Title",
            ElementType::ListItem => "ListItem",
            ElementType::Table => "Table",
        }
    }
}

/// Metadata attached to a structured element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// Page the element was found on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// HTML rendering (tables only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_as_html: Option<String>,
}

/// A normalized document element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredElement {
    /// Element kind
    #[serde(rename = "type")]
    pub kind: ElementType,

    /// Stable identifier derived from position, kind and text
    pub element_id: String,

    /// Element text (CSV for tables)
    pub text: String,

    /// Page number and table HTML
    pub metadata: ElementMetadata,
}

impl StructuredElement {
    /// Create an element for the item at `index` in document order.
    pub fn new(kind: ElementType, text: impl Into<String>, page_number: Option<u32>, index: usize) -> Self {
        let text = text.into();
        Self {
            element_id: element_id(index, kind, &text),
            kind,
            text,
            metadata: ElementMetadata {
                page_number,
                text_as_html: None,
            },
        }
    }

    /// Attach an HTML rendering and return self.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.metadata.text_as_html = Some(html.into());
        self
    }

    /// Page number, if known.
    pub fn page_number(&self) -> Option<u32> {
        self.metadata.page_number
    }
}

fn element_id(index: usize, kind: ElementType, text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(index.to_le_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Map one item to a structured element.
///
/// Pictures have no structured counterpart and map to `None`. Tables fail
/// when their grid cannot be built.
pub fn map_item(index: usize, item: &Item) -> Result<Option<StructuredElement>> {
    let page_number = item.page_no();
    let element = match item {
        Item::Table(t) => {
            let csv = to_csv(&t.table.grid()?)?;
            StructuredElement::new(ElementType::Table, csv, page_number, index)
                .with_html(t.table.to_html())
        }
        Item::SectionHeader(h) => {
            StructuredElement::new(ElementType::Title, h.text.as_str(), page_number, index)
        }
        Item::ListItem(l) => {
            StructuredElement::new(ElementType::ListItem, l.text.as_str(), page_number, index)
        }
        Item::Text(t) => StructuredElement::new(ElementType::Text, t.text.as_str(), page_number, index),
        Item::Picture(_) => return Ok(None),
    };
    Ok(Some(element))
}

/// Map `(index, item)` pairs, dropping items that fail with a warning.
pub fn map_items<'a, I>(items: I) -> Vec<StructuredElement>
where
    I: IntoIterator<Item = (usize, &'a Item)>,
{
    items
        .into_iter()
        .filter_map(|(index, item)| match map_item(index, item) {
            Ok(element) => element,
            Err(e) => {
                if e.is_recoverable() {
                    log::warn!(
                        "Dropping {} item #{} (page {:?}): {}",
                        item.kind_name(),
                        index,
                        item.page_no(),
                        e
                    );
                } else {
                    log::error!(
                        "Failed to map {} item #{} (page {:?}): {}",
                        item.kind_name(),
                        index,
                        item.page_no(),
                        e
                    );
                }
                None
            }
        })
        .collect()
}

/// Map every item of the document, in document order.
pub fn map_elements(doc: &Document) -> Vec<StructuredElement> {
    map_items(doc.items.iter().enumerate())
}
