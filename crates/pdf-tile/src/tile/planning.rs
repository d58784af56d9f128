//! Tiling plan: which page goes where, and with which transform
//!
//! Planning reads page boxes from the source document but does not
//! write any PDF, so it also backs statistics and dry runs.

use crate::layout::*;
use crate::options::TileOptions;
use crate::render::get_page_geometry;
use crate::types::*;
use lopdf::{Document, ObjectId};

use super::select::select_pages;

/// Final placement of a source page on the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlacement {
    /// 1-based page number in the source document
    pub page_number: usize,
    /// Source page object
    pub page_id: ObjectId,
    /// Grid cell the page fills
    pub position: GridPosition,
    /// Trimmed page area in the source page's user space
    pub crop_rect: Rect,
    /// Destination on the sheet (cell plus overlap)
    pub dest_rect: Rect,
    /// Area actually covered by the trimmed page on the sheet
    pub content_rect: Rect,
    /// Transform from source user space to sheet space
    pub matrix: Matrix,
}

/// Everything needed to render the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    /// Total pages in the source document
    pub source_pages: usize,
    /// Pages inside the requested range
    pub selected_pages: usize,
    /// Output sheet width in points
    pub sheet_width_pt: f32,
    /// Output sheet height in points
    pub sheet_height_pt: f32,
    /// Amount trimmed from each side of every page (points)
    pub margin_pt: f32,
    pub layout: GridLayout,
    pub placements: Vec<PagePlacement>,
    /// Page numbers that did not fit in the grid
    pub dropped_pages: Vec<usize>,
}

/// Plan the tiling of `document` according to `options`.
pub fn plan(document: &Document, options: &TileOptions) -> Result<TilePlan> {
    options.validate()?;

    let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();
    let source_pages = page_ids.len();

    log::info!(
        "Extracting pages {}-{} of {}",
        options.page_range.start,
        options.page_range.resolved_end(source_pages),
        source_pages
    );
    let selected = select_pages(&page_ids, &options.page_range)?;

    let margin_pt = options.margin_pt();

    // The first selected page sets the standard cell size
    let reference = get_page_geometry(document, selected[0].id)?;
    let (page_width, page_height) = reference.display_size();
    let (sheet_width_pt, sheet_height_pt) = options.sheet_size_pt();

    let layout = compute_layout(&LayoutRequest {
        page_width,
        page_height,
        rows: options.grid.rows,
        cols: options.grid.cols,
        margin_pt,
        overlap_pt: options.overlap_pt(),
        canvas_width: sheet_width_pt,
        canvas_height: sheet_height_pt,
        scaling: options.scaling,
        cell_order: options.cell_order.clone(),
    })?;
    log::info!(
        "Building {}x{} grid on {} {:?} sheet (scale {:.3})",
        layout.rows,
        layout.cols,
        options.paper_size.label(),
        options.orientation,
        layout.scale
    );

    // Only pages that receive a cell are trimmed
    let placed_count = selected.len().min(layout.slots.len());
    log::info!(
        "Removing {:.1}pt margins from {} pages",
        margin_pt,
        placed_count
    );

    let standard_cell = Rect::new(0.0, 0.0, layout.cell_width_pt, layout.cell_height_pt);
    let mut placements = Vec::with_capacity(placed_count);
    for (page, slot) in selected.iter().zip(&layout.slots) {
        let geometry = get_page_geometry(document, page.id)?;
        let crop_rect = geometry.crop_rect(margin_pt)?;
        let matrix = placement_matrix(&geometry, &crop_rect, &standard_cell, &slot.dest_rect);
        let content_rect = matrix.apply_rect(&crop_rect);
        log::debug!(
            "Page {}: row {}, column {} - position ({:.1}, {:.1})",
            page.number,
            slot.position.row + 1,
            slot.position.col + 1,
            slot.cell_rect.x,
            slot.cell_rect.y
        );
        placements.push(PagePlacement {
            page_number: page.number,
            page_id: page.id,
            position: slot.position,
            crop_rect,
            dest_rect: slot.dest_rect,
            content_rect,
            matrix,
        });
    }

    let dropped_pages: Vec<usize> = selected
        .iter()
        .skip(layout.slots.len())
        .map(|page| page.number)
        .collect();
    if !dropped_pages.is_empty() {
        log::warn!(
            "{} pages do not fit in the {} available cells and were left out: {:?}",
            dropped_pages.len(),
            layout.slots.len(),
            dropped_pages
        );
    }

    Ok(TilePlan {
        source_pages,
        selected_pages: selected.len(),
        sheet_width_pt,
        sheet_height_pt,
        margin_pt,
        layout,
        placements,
        dropped_pages,
    })
}

/// Transform that paints the trimmed page into its destination.
///
/// Two fits are chained: the trimmed page is fitted into the standard
/// cell (so every tile has the reference page's size), and the cell is
/// then fitted into the destination rectangle.
pub fn placement_matrix(
    geometry: &PageGeometry,
    crop_rect: &Rect,
    standard_cell: &Rect,
    dest_rect: &Rect,
) -> Matrix {
    let upright = geometry.display_matrix(crop_rect);
    let (display_width, display_height) = geometry.display_size_of(crop_rect);

    let (cell_scale, in_cell) = fit_rect(display_width, display_height, standard_cell);
    let to_cell = Matrix::scale_translate(cell_scale, in_cell.x, in_cell.y);

    let (sheet_scale, on_sheet) = fit_rect(standard_cell.width, standard_cell.height, dest_rect);
    let to_sheet = Matrix::scale_translate(sheet_scale, on_sheet.x, on_sheet.y);

    upright.then(&to_cell).then(&to_sheet)
}
