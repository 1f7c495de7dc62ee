//! Document-level types.

use super::{Item, Rect};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A parsed document: pages plus a flat, ordered item stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document name (usually the input file stem)
    #[serde(default)]
    pub name: String,

    /// Pages keyed by 1-indexed page number
    #[serde(default)]
    pub pages: BTreeMap<u32, Page>,

    /// Items in reading order
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_no: u32) -> Option<&Page> {
        self.pages.get(&page_no)
    }

    /// Add a page, replacing any page with the same number.
    pub fn add_page(&mut self, page: Page) {
        self.pages.insert(page.page_no, page);
    }

    /// Append an item.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Check if the document has neither pages nor items.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.items.is_empty()
    }

    /// Items located on a page, with their document index, in document order.
    pub fn items_on_page(&self, page_no: u32) -> impl Iterator<Item = (usize, &Item)> {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.is_on_page(page_no))
    }

    /// Bounding boxes of the pictures on a page, in document order.
    pub fn picture_boxes(&self, page_no: u32) -> Vec<Rect> {
        self.items_on_page(page_no)
            .filter(|(_, item)| item.is_picture())
            .filter_map(|(_, item)| item.bbox())
            .collect()
    }

    /// Table items, in document order.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.items.iter().enumerate().filter(|(_, item)| item.is_table())
    }

    /// Load the raster of every page that references an image file.
    ///
    /// Relative paths are resolved against `base_dir`. A page whose image
    /// cannot be read keeps no raster; figure extraction then skips it.
    /// Returns the number of rasters loaded.
    pub fn load_images(&mut self, base_dir: &Path) -> usize {
        let mut loaded = 0;
        for page in self.pages.values_mut() {
            let Some(ref rel) = page.image else {
                continue;
            };
            let path = base_dir.join(rel);
            match image::open(&path) {
                Ok(img) => {
                    page.raster = Some(img);
                    loaded += 1;
                }
                Err(e) => {
                    log::warn!(
                        "Failed to load image for page {} of {}: {} ({})",
                        page.page_no,
                        self.name,
                        path.display(),
                        e
                    );
                }
            }
        }
        loaded
    }
}

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub page_no: u32,

    /// Page width in pixels
    pub width: f32,

    /// Page height in pixels
    pub height: f32,

    /// Path of the rendered page image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,

    /// Rendered page raster, when loaded
    #[serde(skip)]
    pub raster: Option<DynamicImage>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(page_no: u32, width: f32, height: f32) -> Self {
        Self {
            page_no,
            width,
            height,
            image: None,
            raster: None,
        }
    }

    /// Attach an in-memory raster and return self.
    pub fn with_raster(mut self, raster: DynamicImage) -> Self {
        self.raster = Some(raster);
        self
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Status reported by the upstream converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Not yet started
    Pending,
    /// Converted completely
    #[default]
    Success,
    /// Converted with recoverable errors
    PartialSuccess,
    /// Conversion failed
    Failure,
    /// Input was skipped
    Skipped,
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::PartialSuccess => "partial_success",
            Self::Failure => "failure",
            Self::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

/// Output of the upstream conversion of one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Input file that was converted
    pub input: PathBuf,

    /// Conversion status
    #[serde(default)]
    pub status: ConversionStatus,

    /// Converted document (absent on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,

    /// Errors reported by the converter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ConversionResult {
    /// Wrap a successfully converted document.
    pub fn success(input: impl Into<PathBuf>, document: Document) -> Self {
        Self {
            input: input.into(),
            status: ConversionStatus::Success,
            document: Some(document),
            errors: Vec::new(),
        }
    }

    /// Record a failed conversion.
    pub fn failure(input: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            status: ConversionStatus::Failure,
            document: None,
            errors: vec![error.into()],
        }
    }
}
