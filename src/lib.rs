//! # docslice
//!
//! Post-processing of converted documents into retrieval-ready artifacts.
//!
//! A document converter hands over a flat stream of page-annotated items
//! (text, headings, list entries, tables and picture boxes) together with
//! rendered page images. This library turns that stream into figure crops,
//! table files, whole-document and per-page Markdown, and structured element
//! JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docslice::{load_result, ExportOptions, Exporter};
//!
//! fn main() -> docslice::Result<()> {
//!     // Read a conversion result and its page images
//!     let result = load_result("converted/report.json")?;
//!
//!     // Write every artifact under out/output_report/
//!     let exporter = Exporter::new(ExportOptions::default());
//!     let report = exporter.save(&result, "out")?;
//!     println!("{} figures saved", report.figures_saved);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Figure extraction**: fragmented picture boxes are clustered, grown to
//!   include a nearby heading, padded and cropped from the page raster
//! - **Per-page splitting**: Markdown and element JSON for every page
//! - **Structured elements**: Title/Text/ListItem/Table records with stable ids
//! - **Table export**: CSV and Markdown pipe tables
//! - **Parallel processing**: Uses Rayon across documents

pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{sanitize_filename, ExportReport, Exporter};
pub use model::{
    ConversionResult, ConversionStatus, Document, Item, Page, Provenance, Rect, Table, TableCell,
    TableRow,
};
pub use render::{
    to_json, to_markdown, ElementType, ExportOptions, FigureOptions, JsonFormat,
    StructuredElement,
};

use std::fs;
use std::path::Path;

/// Read a conversion result from its JSON file and load its page images.
///
/// Page image paths are resolved relative to the directory of the JSON
/// file. Pages whose image cannot be read are kept without a raster.
///
/// # Example
///
/// ```no_run
/// let result = docslice::load_result("converted/report.json").unwrap();
/// println!("Status: {}", result.status);
/// ```
pub fn load_result<P: AsRef<Path>>(path: P) -> Result<ConversionResult> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let mut result: ConversionResult = serde_json::from_str(&data)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    if let Some(ref mut doc) = result.document {
        let loaded = doc.load_images(base_dir);
        log::debug!(
            "Loaded {} of {} page images for {}",
            loaded,
            doc.page_count(),
            path.display()
        );
    }
    Ok(result)
}

/// Read a conversion result and export it with default options.
pub fn export_file<P: AsRef<Path>, Q: AsRef<Path>>(path: P, output_root: Q) -> Result<ExportReport> {
    let result = load_result(path)?;
    Exporter::default().save(&result, output_root)
}

/// Get library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_load_result_resolves_images() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(40, 30)
            .save(dir.path().join("page_1.png"))
            .unwrap();

        let json = r#"{
            "input": "scan.pdf",
            "status": "success",
            "document": {
                "name": "scan",
                "pages": {
                    "1": {"page_no": 1, "width": 40, "height": 30, "image": "page_1.png"},
                    "2": {"page_no": 2, "width": 40, "height": 30}
                },
                "items": []
            }
        }"#;
        let path = dir.path().join("scan.json");
        fs::write(&path, json).unwrap();

        let result = load_result(&path).unwrap();
        let doc = result.document.unwrap();
        let raster = doc.get_page(1).unwrap().raster.as_ref().unwrap();
        assert_eq!((raster.width(), raster.height()), (40, 30));
        assert!(doc.get_page(2).unwrap().raster.is_none());
    }

    #[test]
    fn test_load_result_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_result(&path), Err(Error::Json(_))));
    }
}
