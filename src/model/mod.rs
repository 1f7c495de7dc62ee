//! Document model types consumed by the exporters.
//!
//! This module defines the in-memory representation of an already-parsed
//! document: pages with optional rasters, and a flat item stream where every
//! item may carry a page number and a pixel bounding box.

mod document;
mod geometry;
mod item;
mod table;

pub use document::{ConversionResult, ConversionStatus, Document, Page};
pub use geometry::Rect;
pub use item::{
    Item, ListEntry, PictureItem, Provenance, SectionHeaderItem, TableItem, TextItem,
};
pub use table::{Table, TableCell, TableGrid, TableRow};
