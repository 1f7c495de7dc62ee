//! Per-page partitioning of a document.

use crate::model::{Document, Item};
use crate::render::{map_items, to_json, JsonFormat, StructuredElement};
use std::fs;
use std::path::Path;

/// Artifacts of a single page.
#[derive(Debug, Clone)]
pub struct PageExport {
    /// Page number (1-indexed)
    pub page_no: u32,

    /// Approximate Markdown of the page
    pub markdown: String,

    /// Structured elements located on the page
    pub elements: Vec<StructuredElement>,
}

/// Markdown approximation of the items located on `page_no`.
///
/// Pictures contribute nothing and tables are reduced to a placeholder.
pub fn page_markdown<'a, I>(items: I, page_no: u32) -> String
where
    I: IntoIterator<Item = &'a Item>,
{
    let fragments: Vec<String> = items
        .into_iter()
        .filter(|item| item.is_on_page(page_no))
        .filter_map(|item| match item {
            Item::SectionHeader(h) => Some(format!("## {}", h.text)),
            Item::ListItem(l) => Some(format!("- {}", l.text)),
            Item::Text(t) => Some(t.text.clone()),
            Item::Table(_) => Some(format!("[TABLE ON PAGE {}]", page_no)),
            Item::Picture(_) => None,
        })
        .collect();
    fragments.join("\n\n")
}

/// Outcome of writing the pages of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Page directories written
    pub written: usize,

    /// Pages that failed to write
    pub failed: usize,
}

/// Split a document into one export per page, in page order.
///
/// Every page of the document gets an entry, even when no item is located
/// on it. Items without provenance belong to no page.
pub fn split_pages(doc: &Document) -> Vec<PageExport> {
    doc.pages
        .keys()
        .map(|&page_no| PageExport {
            page_no,
            markdown: page_markdown(&doc.items, page_no),
            elements: map_items(doc.items_on_page(page_no)),
        })
        .collect()
}

/// Write `page_{N}/{base}_pg{N}.md` and `.json` under `pages_root`.
///
/// A page that fails to write is logged, counted and skipped; the other
/// pages are still written.
pub fn save_pages(doc: &Document, pages_root: &Path, base: &str, format: JsonFormat) -> PageSummary {
    let mut summary = PageSummary::default();

    for page in split_pages(doc) {
        match save_page(&page, pages_root, base, format) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                log::warn!("{}: failed to write page {}: {}", doc.name, page.page_no, e);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "{}: split content into {} page(s) in {}",
        doc.name,
        summary.written,
        pages_root.display()
    );
    summary
}

fn save_page(page: &PageExport, pages_root: &Path, base: &str, format: JsonFormat) -> crate::Result<()> {
    let page_dir = pages_root.join(format!("page_{}", page.page_no));
    fs::create_dir_all(&page_dir)?;

    let stem = format!("{}_pg{}", base, page.page_no);
    fs::write(page_dir.join(format!("{}.md", stem)), &page.markdown)?;
    fs::write(
        page_dir.join(format!("{}.json", stem)),
        to_json(&page.elements, format)?,
    )?;
    Ok(())
}
