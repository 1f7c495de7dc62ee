//! Heading context for figure regions.

use crate::model::{Item, Rect};

/// Grow the top edge of `bbox` to take in the text that introduces it.
///
/// Candidates are `Text` and `SectionHeader` items on `page_no` that end
/// strictly above the box with a vertical gap below `max_distance`. The box
/// is extended to the smallest `y0` among all candidates, so a tall heading
/// further up wins over a short paragraph right above the figure. Without a
/// candidate the box is returned unchanged.
pub fn expand_with_header<'a, I>(items: I, page_no: u32, bbox: Rect, max_distance: f32) -> Rect
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut best_top = bbox.y0;

    for item in items {
        let prov = match item {
            Item::SectionHeader(h) => h.prov.as_ref(),
            Item::Text(t) => t.prov.as_ref(),
            Item::ListItem(_) | Item::Table(_) | Item::Picture(_) => None,
        };
        let Some(prov) = prov else {
            continue;
        };
        if prov.page_no != page_no {
            continue;
        }

        let h = prov.bbox;
        if h.y1 < bbox.y0 && bbox.y0 - h.y1 < max_distance {
            best_top = best_top.min(h.y0);
        }
    }

    Rect::new(bbox.x0, best_top, bbox.x1, bbox.y1)
}
