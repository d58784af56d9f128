use crate::constants::pt_to_mm;
use crate::options::TileOptions;
use crate::tile::{TilePlan, plan};
use crate::types::*;
use lopdf::Document;

/// Calculate statistics for the tiling without rendering anything
pub fn calculate_statistics(
    document: &Document,
    options: &TileOptions,
) -> Result<TileStatistics> {
    let plan = plan(document, options)?;
    Ok(plan_statistics(&plan, options))
}

/// Statistics of an existing plan
pub fn plan_statistics(plan: &TilePlan, options: &TileOptions) -> TileStatistics {
    let layout = &plan.layout;

    let grid_cells = layout.cell_count();
    let placed_pages = plan.placements.len();

    TileStatistics {
        source_pages: plan.source_pages,
        selected_pages: plan.selected_pages,
        placed_pages,
        dropped_pages: plan.dropped_pages.len(),
        grid_cells,
        empty_cells: grid_cells - placed_pages,
        scale: layout.scale,
        cell_size_mm: (
            pt_to_mm(layout.scaled_cell_width()),
            pt_to_mm(layout.scaled_cell_height()),
        ),
        grid_size_mm: (
            pt_to_mm(layout.grid_rect.width),
            pt_to_mm(layout.grid_rect.height),
        ),
        sheet_size_mm: options
            .paper_size
            .dimensions_with_orientation(options.orientation),
    }
}
