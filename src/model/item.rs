//! Document items and their provenance.

use super::{Rect, Table};
use serde::{Deserialize, Serialize};

/// Location of an item on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Page number (1-indexed)
    pub page_no: u32,

    /// Bounding box in page-pixel space
    pub bbox: Rect,
}

impl Provenance {
    /// Create a new provenance record.
    pub fn new(page_no: u32, bbox: Rect) -> Self {
        Self { page_no, bbox }
    }
}

/// A content item produced by the upstream document parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    /// Body text
    Text(TextItem),

    /// A section heading
    SectionHeader(SectionHeaderItem),

    /// A list entry
    ListItem(ListEntry),

    /// A table
    Table(TableItem),

    /// A detected picture region
    Picture(PictureItem),
}

/// A paragraph of body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    /// Text content
    pub text: String,

    /// Location on the page, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,
}

/// A section heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHeaderItem {
    /// Heading text
    pub text: String,

    /// Heading level (1 = top-level section)
    #[serde(default = "default_level")]
    pub level: u8,

    /// Location on the page, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,
}

fn default_level() -> u8 {
    1
}

/// A single list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    /// Entry text without its marker
    pub text: String,

    /// Location on the page, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,
}

/// A table with its recognized structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableItem {
    /// Table content
    pub table: Table,

    /// Location on the page, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,
}

/// A picture detection box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PictureItem {
    /// Caption attached by the parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Location on the page, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,
}

impl Item {
    /// Create a text item.
    pub fn text(text: impl Into<String>, prov: Option<Provenance>) -> Self {
        Item::Text(TextItem {
            text: text.into(),
            prov,
        })
    }

    /// Create a level-1 section header.
    pub fn section_header(text: impl Into<String>, prov: Option<Provenance>) -> Self {
        Item::SectionHeader(SectionHeaderItem {
            text: text.into(),
            level: 1,
            prov,
        })
    }

    /// Create a list item.
    pub fn list_item(text: impl Into<String>, prov: Option<Provenance>) -> Self {
        Item::ListItem(ListEntry {
            text: text.into(),
            prov,
        })
    }

    /// Create a table item.
    pub fn table(table: Table, prov: Option<Provenance>) -> Self {
        Item::Table(TableItem { table, prov })
    }

    /// Create a picture item.
    pub fn picture(prov: Option<Provenance>) -> Self {
        Item::Picture(PictureItem { caption: None, prov })
    }

    /// Provenance of the item, if any.
    pub fn prov(&self) -> Option<&Provenance> {
        match self {
            Item::Text(i) => i.prov.as_ref(),
            Item::SectionHeader(i) => i.prov.as_ref(),
            Item::ListItem(i) => i.prov.as_ref(),
            Item::Table(i) => i.prov.as_ref(),
            Item::Picture(i) => i.prov.as_ref(),
        }
    }

    /// Page number from provenance.
    pub fn page_no(&self) -> Option<u32> {
        self.prov().map(|p| p.page_no)
    }

    /// Bounding box from provenance.
    pub fn bbox(&self) -> Option<Rect> {
        self.prov().map(|p| p.bbox)
    }

    /// Check if the item is located on the given page.
    pub fn is_on_page(&self, page_no: u32) -> bool {
        self.page_no() == Some(page_no)
    }

    /// Short kind label used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Text(_) => "text",
            Item::SectionHeader(_) => "section_header",
            Item::ListItem(_) => "list_item",
            Item::Table(_) => "table",
            Item::Picture(_) => "picture",
        }
    }

    /// Check if this item is a picture.
    pub fn is_picture(&self) -> bool {
        matches!(self, Item::Picture(_))
    }

    /// Check if this item is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Item::Table(_))
    }
}
