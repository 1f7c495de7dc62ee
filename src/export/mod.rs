//! Writing the artifacts of converted documents to disk.
//!
//! One conversion result produces a self-contained directory:
//!
//! ```text
//! output_{stem}/
//!   {stem}_full.md
//!   {stem}_full.json
//!   tables/{stem}_table_{i}.csv, .md
//!   figures/{stem}_pg{N}_smart_fig_{i}.png
//!   pages/page_{N}/{stem}_pg{N}.md, .json
//! ```

pub mod figures;
pub mod pages;
pub mod tables;

pub use figures::{crop_region, extract_figures, plan_page_figures, FigurePlan, FigureSummary};
pub use pages::{page_markdown, save_pages, split_pages, PageExport, PageSummary};
pub use tables::{export_tables, to_csv, to_markdown_table, TableSummary};

use crate::error::{Error, Result};
use crate::model::{ConversionResult, ConversionStatus, Document};
use crate::render::{map_elements, to_json, to_markdown, ExportOptions};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Replace characters that are invalid in file names with `_`.
///
/// Surrounding whitespace is trimmed first.
pub fn sanitize_filename(name: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let re = INVALID.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
    re.replace_all(name.trim(), "_").into_owned()
}

/// Sanitized stem used to name every artifact of a conversion.
pub fn output_stem(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let clean = sanitize_filename(&stem);
    if clean.is_empty() {
        "document".to_string()
    } else {
        clean
    }
}

/// Statistics of one exported document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Input file of the conversion
    pub input: PathBuf,

    /// Directory holding every artifact
    pub output_dir: PathBuf,

    /// Structured elements in the whole-document JSON
    pub element_count: usize,

    /// Figure images written
    pub figures_saved: usize,

    /// Clusters dropped by the size filter
    pub figures_filtered: usize,

    /// Figures that failed to crop or save
    pub figures_failed: usize,

    /// Table files (CSV and Markdown) written
    pub tables_written: usize,

    /// Table files that could not be produced
    pub tables_failed: usize,

    /// Page directories written
    pub pages_written: usize,

    /// Pages that failed to write
    pub pages_failed: usize,
}

impl ExportReport {
    /// Whether any figure, table or page failed along the way.
    pub fn has_failures(&self) -> bool {
        self.figures_failed > 0 || self.tables_failed > 0 || self.pages_failed > 0
    }
}

/// Drives every exporter for converted documents.
///
/// # Example
///
/// ```no_run
/// use docslice::{load_result, ExportOptions, Exporter};
///
/// let result = load_result("converted/report.json").unwrap();
/// let exporter = Exporter::new(ExportOptions::new().with_pretty_json(true));
/// let report = exporter.save(&result, "out").unwrap();
/// println!("{} figures", report.figures_saved);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter with the given options.
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Export one conversion result under `output_root/output_{stem}/`.
    ///
    /// Results whose status is not `success` are rejected without writing
    /// anything. Failures of single figures, tables or pages are logged and
    /// counted in the report.
    pub fn save<P: AsRef<Path>>(&self, result: &ConversionResult, output_root: P) -> Result<ExportReport> {
        let name = result
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.input.display().to_string());

        if result.status != ConversionStatus::Success {
            log::error!("Conversion failed for {} (status: {})", name, result.status);
            for err in &result.errors {
                log::error!("  - {}", err);
            }
            return Err(Error::ConversionFailed {
                input: result.input.clone(),
                status: result.status,
            });
        }
        let doc = result
            .document
            .as_ref()
            .ok_or_else(|| Error::InvalidDocument(format!("{} has no document", name)))?;

        let stem = output_stem(&result.input);
        let output_dir = output_root.as_ref().join(format!("output_{}", stem));
        let mut report = self.export_document(doc, &output_dir, &stem)?;
        report.input = result.input.clone();

        log::info!("Saved {} -> {}", name, output_dir.display());
        Ok(report)
    }

    /// Export several conversion results in parallel.
    ///
    /// Documents are independent: each entry of the returned list is the
    /// outcome of the result at the same position.
    pub fn save_all<P: AsRef<Path> + Sync>(
        &self,
        results: &[ConversionResult],
        output_root: P,
    ) -> Vec<Result<ExportReport>> {
        results
            .par_iter()
            .map(|result| self.save(result, output_root.as_ref()))
            .collect()
    }

    /// Write every artifact of `doc` into `output_dir`, naming files after `base`.
    pub fn export_document(&self, doc: &Document, output_dir: &Path, base: &str) -> Result<ExportReport> {
        let tables_dir = output_dir.join("tables");
        let figures_dir = output_dir.join("figures");
        let pages_dir = output_dir.join("pages");
        for dir in [output_dir, tables_dir.as_path(), figures_dir.as_path(), pages_dir.as_path()] {
            fs::create_dir_all(dir)?;
        }

        let format = self.options.json_format;
        fs::write(output_dir.join(format!("{}_full.md", base)), to_markdown(doc))?;
        let elements = map_elements(doc);
        fs::write(
            output_dir.join(format!("{}_full.json", base)),
            to_json(&elements, format)?,
        )?;

        let tables = export_tables(doc, &tables_dir, base);
        let figures = extract_figures(doc, &figures_dir, base, &self.options.figures);
        let pages = save_pages(doc, &pages_dir, base, format);

        log::debug!(
            "{}: {} elements, {} figures, {} table files, {} pages",
            doc.name,
            elements.len(),
            figures.saved_count(),
            tables.written,
            pages.written
        );

        Ok(ExportReport {
            input: PathBuf::new(),
            output_dir: output_dir.to_path_buf(),
            element_count: elements.len(),
            figures_saved: figures.saved_count(),
            figures_filtered: figures.filtered,
            figures_failed: figures.failed,
            tables_written: tables.written,
            tables_failed: tables.failed,
            pages_written: pages.written,
            pages_failed: pages.failed,
        })
    }
}
