//! Figure extraction: picture fragments to cropped figure images.
//!
//! Per page, picture boxes are clustered, small clusters are dropped, each
//! surviving cluster is grown upward to take in a nearby heading, padded,
//! and finally cropped out of the page raster.

use crate::error::{Error, Result};
use crate::layout::{cluster, expand_with_header, meets_min_size, pad};
use crate::model::{Document, Rect};
use crate::render::FigureOptions;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::{Path, PathBuf};

/// A figure region planned on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigurePlan {
    /// 1-based position of the cluster among all clusters of the page
    pub index: usize,

    /// Merged picture boxes
    pub cluster: Rect,

    /// Final crop rectangle after header expansion and padding
    pub region: Rect,
}

/// Outcome of extracting the figures of one document.
#[derive(Debug, Clone, Default)]
pub struct FigureSummary {
    /// Pages that had a raster to crop from
    pub pages_scanned: usize,

    /// Clusters formed across all scanned pages
    pub clusters: usize,

    /// Clusters dropped by the size filter
    pub filtered: usize,

    /// Figures that failed to crop or save
    pub failed: usize,

    /// Files written
    pub saved: Vec<PathBuf>,
}

impl FigureSummary {
    /// Number of figures written.
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

/// Plan the figure regions of a page of the given size.
///
/// Clusters keep their position in the full cluster list, so the indexes of
/// kept figures can have gaps where small clusters were filtered out.
pub fn plan_page_figures(
    doc: &Document,
    page_no: u32,
    width: f32,
    height: f32,
    options: &FigureOptions,
) -> Vec<FigurePlan> {
    plan_page(doc, page_no, width, height, options).1
}

/// Plans of a page, with the number of clusters formed before filtering.
fn plan_page(
    doc: &Document,
    page_no: u32,
    width: f32,
    height: f32,
    options: &FigureOptions,
) -> (usize, Vec<FigurePlan>) {
    let boxes = doc.picture_boxes(page_no);
    if boxes.is_empty() {
        return (0, Vec::new());
    }

    let clusters = cluster(&boxes, options.cluster_threshold);
    log::debug!(
        "{}: page {} has {} picture boxes in {} clusters",
        doc.name,
        page_no,
        boxes.len(),
        clusters.len()
    );

    let formed = clusters.len();
    let plans = clusters
        .into_iter()
        .enumerate()
        .filter_map(|(i, merged)| {
            if !meets_min_size(&merged, options.min_size) {
                log::debug!(
                    "{}: page {} cluster {} is below {}px: {}",
                    doc.name,
                    page_no,
                    i + 1,
                    options.min_size,
                    merged
                );
                return None;
            }
            let expanded =
                expand_with_header(&doc.items, page_no, merged, options.header_max_distance);
            Some(FigurePlan {
                index: i + 1,
                cluster: merged,
                region: pad(expanded, width, height, options.padding),
            })
        })
        .collect();
    (formed, plans)
}

/// Crop `region` out of a page raster.
///
/// Edges are rounded to whole pixels and clamped to the raster. An inverted
/// region, one with non-finite edges, or one that is empty after clamping
/// is a [`Error::DegenerateRegion`].
pub fn crop_region(raster: &DynamicImage, page_no: u32, region: Rect) -> Result<DynamicImage> {
    let degenerate = || Error::DegenerateRegion {
        page: page_no,
        rect: region,
    };

    let edges = [region.x0, region.y0, region.x1, region.y1];
    if !region.is_valid() || edges.iter().any(|v| !v.is_finite()) {
        return Err(degenerate());
    }

    let (width, height) = raster.dimensions();
    let clamp = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
    let x0 = clamp(region.x0, width);
    let y0 = clamp(region.y0, height);
    let x1 = clamp(region.x1, width);
    let y1 = clamp(region.y1, height);

    if x1 <= x0 || y1 <= y0 {
        return Err(degenerate());
    }
    Ok(raster.crop_imm(x0, y0, x1 - x0, y1 - y0))
}

/// File name of a figure.
pub fn figure_file_name(base: &str, page_no: u32, index: usize) -> String {
    format!("{}_pg{}_smart_fig_{}.png", base, page_no, index)
}

/// Crop and save the figures of every page that has a raster.
///
/// Regions are clamped against the raster dimensions. A figure that fails
/// to crop or save is logged and skipped; its siblings are still written.
pub fn extract_figures(
    doc: &Document,
    figures_dir: &Path,
    base: &str,
    options: &FigureOptions,
) -> FigureSummary {
    let mut summary = FigureSummary::default();

    for page in doc.pages.values() {
        let Some(ref raster) = page.raster else {
            log::debug!("{}: page {} has no raster, skipping figures", doc.name, page.page_no);
            continue;
        };
        summary.pages_scanned += 1;

        let (width, height) = raster.dimensions();
        let (formed, plans) = plan_page(doc, page.page_no, width as f32, height as f32, options);
        summary.clusters += formed;
        summary.filtered += formed - plans.len();

        for plan in plans {
            let path = figures_dir.join(figure_file_name(base, page.page_no, plan.index));
            match save_figure(raster, page.page_no, &plan, &path) {
                Ok(()) => {
                    log::debug!("{}: saved {}", doc.name, path.display());
                    summary.saved.push(path);
                }
                Err(e) => {
                    if e.is_recoverable() {
                        log::warn!(
                            "{}: skipping figure {} on page {}: {}",
                            doc.name,
                            plan.index,
                            page.page_no,
                            e
                        );
                    } else {
                        log::error!(
                            "{}: failed to write figure {} on page {}: {}",
                            doc.name,
                            plan.index,
                            page.page_no,
                            e
                        );
                    }
                    summary.failed += 1;
                }
            }
        }
    }

    summary
}

fn save_figure(raster: &DynamicImage, page_no: u32, plan: &FigurePlan, path: &Path) -> Result<()> {
    let crop = crop_region(raster, page_no, plan.region)?;
    crop.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Page, Provenance};
    use image::RgbImage;

    fn on_page(page: u32, rect: Rect) -> Option<Provenance> {
        Some(Provenance::new(page, rect))
    }

    fn sample_doc() -> Document {
        let mut doc = Document::new("sample");
        doc.add_page(Page::new(1, 800.0, 600.0));
        doc.add_item(Item::section_header(
            "Figure 1",
            on_page(1, Rect::new(50.0, 40.0, 300.0, 70.0)),
        ));
        doc.add_item(Item::picture(on_page(1, Rect::new(100.0, 100.0, 200.0, 200.0))));
        doc.add_item(Item::picture(on_page(1, Rect::new(210.0, 150.0, 300.0, 250.0))));
        doc
    }

    #[test]
    fn test_plan_merges_expands_and_pads() {
        let plans = plan_page_figures(&sample_doc(), 1, 800.0, 600.0, &FigureOptions::default());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].index, 1);
        assert_eq!(plans[0].cluster, Rect::new(100.0, 100.0, 300.0, 250.0));
        assert_eq!(plans[0].region, Rect::new(80.0, 20.0, 320.0, 270.0));
    }

    #[test]
    fn test_plan_keeps_cluster_positions() {
        let mut doc = Document::new("gaps");
        // Small, isolated fragment first, then a large one
        doc.add_item(Item::picture(on_page(1, Rect::new(0.0, 0.0, 20.0, 20.0))));
        doc.add_item(Item::picture(on_page(1, Rect::new(400.0, 300.0, 700.0, 550.0))));

        let plans = plan_page_figures(&doc, 1, 800.0, 600.0, &FigureOptions::default());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].index, 2);
    }

    #[test]
    fn test_plan_empty_page() {
        let plans = plan_page_figures(&sample_doc(), 2, 800.0, 600.0, &FigureOptions::default());
        assert!(plans.is_empty());
    }

    #[test]
    fn test_crop_region_rounds_and_clamps() {
        let raster = DynamicImage::ImageRgb8(RgbImage::new(100, 80));
        let crop = crop_region(&raster, 1, Rect::new(9.6, -5.0, 150.0, 40.2)).unwrap();
        assert_eq!(crop.dimensions(), (90, 40));
    }

    #[test]
    fn test_crop_region_degenerate() {
        let raster = DynamicImage::ImageRgb8(RgbImage::new(100, 80));
        let err = crop_region(&raster, 4, Rect::new(50.0, 10.0, 50.0, 60.0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateRegion { page: 4, .. }));

        let outside = Rect::new(120.0, 10.0, 160.0, 60.0);
        assert!(crop_region(&raster, 4, outside).is_err());

        let nan = Rect::new(f32::NAN, 0.0, 10.0, 10.0);
        assert!(crop_region(&raster, 4, nan).is_err());

        let infinite = Rect::new(0.0, 0.0, f32::INFINITY, 10.0);
        assert!(crop_region(&raster, 4, infinite).is_err());
    }

    #[test]
    fn test_crop_region_rejects_inverted() {
        let raster = DynamicImage::ImageRgb8(RgbImage::new(100, 80));
        // Would clamp to a valid 20x40 crop if the edges were swapped
        let inverted = Rect::new(60.0, 10.0, 40.0, 50.0);
        let err = crop_region(&raster, 2, inverted).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, Error::DegenerateRegion { page: 2, .. }));
    }

    #[test]
    fn test_figure_file_name() {
        assert_eq!(figure_file_name("report", 3, 2), "report_pg3_smart_fig_2.png");
    }
}
