//! Page range selection

use crate::types::*;
use lopdf::ObjectId;

/// A source page picked for tiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPage {
    /// 1-based page number in the source document
    pub number: usize,
    /// Object ID of the page dictionary
    pub id: ObjectId,
}

/// Pick the pages of `range` from the document's pages (in document order).
///
/// Page numbers past the end of the document are skipped.
pub fn select_pages(page_ids: &[ObjectId], range: &PageRange) -> Result<Vec<SelectedPage>> {
    let page_count = page_ids.len();
    if page_count == 0 {
        return Err(TileError::NoPages);
    }

    let start = range.start;
    let end = range.resolved_end(page_count);
    if start == 0 {
        return Err(TileError::Config("Page numbers start at 1".to_string()));
    }
    if range.end.is_some() && start > end {
        return Err(TileError::Config(format!(
            "Start page ({}) must not be after end page ({})",
            start, end
        )));
    }

    if end > page_count {
        log::warn!(
            "Requested pages up to {} but the document only has {}; skipping the rest",
            end,
            page_count
        );
    }

    let selected: Vec<SelectedPage> = (start..=end.min(page_count))
        .map(|number| SelectedPage {
            number,
            id: page_ids[number - 1],
        })
        .collect();

    if selected.is_empty() {
        return Err(TileError::EmptyPageRange {
            start,
            end,
            page_count,
        });
    }

    Ok(selected)
}
