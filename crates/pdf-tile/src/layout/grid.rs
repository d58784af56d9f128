//! Grid layout calculation
//!
//! This module computes where every cell of the R×C grid lands on the
//! output sheet: cell size from the trimmed reference page, uniform
//! scale, centering offsets, overlap and fill order.

use std::collections::HashSet;

use crate::constants::MAX_GRID_DIMENSION;
use crate::types::{CellOrder, Result, ScalingMode, TileError};

use super::{CellSlot, GridLayout, GridPosition, Rect};

/// Inputs to [`compute_layout`]
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    /// Displayed width of the reference page, before trimming (points)
    pub page_width: f32,
    /// Displayed height of the reference page, before trimming (points)
    pub page_height: f32,
    pub rows: usize,
    pub cols: usize,
    /// Amount removed from each side of the page (points)
    pub margin_pt: f32,
    /// Amount each destination rectangle grows on every side (points)
    pub overlap_pt: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub scaling: ScalingMode,
    pub cell_order: CellOrder,
}

// =============================================================================
// Grid Creation
// =============================================================================

/// Compute per-cell destination rectangles on the output sheet.
///
/// Slots are returned in fill order: row-major, or the order of the
/// selected cells. The grid is centered; with [`ScalingMode::ActualSize`]
/// the centering offset never goes negative, so an oversized grid is
/// anchored at the top-left corner of the sheet.
pub fn compute_layout(request: &LayoutRequest) -> Result<GridLayout> {
    validate_grid(request.rows, request.cols)?;
    validate_cell_order(&request.cell_order, request.rows, request.cols)?;
    validate_dimensions(request)?;

    let cell_width_pt = request.page_width - 2.0 * request.margin_pt;
    let cell_height_pt = request.page_height - 2.0 * request.margin_pt;
    if !(cell_width_pt > 0.0 && cell_height_pt > 0.0) {
        return Err(TileError::MarginTooLarge {
            margin_pt: request.margin_pt,
            width_pt: request.page_width,
            height_pt: request.page_height,
        });
    }

    let total_width = request.cols as f32 * cell_width_pt;
    let total_height = request.rows as f32 * cell_height_pt;

    let scale = calculate_scale(
        request.scaling,
        total_width,
        total_height,
        request.canvas_width,
        request.canvas_height,
    )?;

    let grid_width = total_width * scale;
    let grid_height = total_height * scale;
    let offset_x = ((request.canvas_width - grid_width) / 2.0).max(0.0);
    let offset_y = ((request.canvas_height - grid_height) / 2.0).max(0.0);

    // offset_y is measured from the top of the sheet
    let grid_rect = Rect::new(
        offset_x,
        request.canvas_height - offset_y - grid_height,
        grid_width,
        grid_height,
    );

    let mut layout = GridLayout {
        rows: request.rows,
        cols: request.cols,
        cell_width_pt,
        cell_height_pt,
        scale,
        overlap_pt: request.overlap_pt,
        canvas_width_pt: request.canvas_width,
        canvas_height_pt: request.canvas_height,
        grid_rect,
        slots: Vec::new(),
    };

    layout.slots = fill_order(&request.cell_order, request.rows, request.cols)
        .into_iter()
        .map(|position| {
            let cell_rect = layout.cell_rect(position);
            CellSlot {
                position,
                cell_rect,
                dest_rect: cell_rect.expand(request.overlap_pt),
            }
        })
        .collect();

    Ok(layout)
}

/// Uniform scale for the whole grid
fn calculate_scale(
    scaling: ScalingMode,
    total_width: f32,
    total_height: f32,
    canvas_width: f32,
    canvas_height: f32,
) -> Result<f32> {
    match scaling {
        ScalingMode::ActualSize => Ok(1.0),
        ScalingMode::Fit { fill_fraction } => {
            validate_fill_fraction(fill_fraction)?;
            Ok((fill_fraction * canvas_width / total_width)
                .min(fill_fraction * canvas_height / total_height))
        }
    }
}

/// Grid positions in the order pages are assigned to them
pub fn fill_order(order: &CellOrder, rows: usize, cols: usize) -> Vec<GridPosition> {
    match order {
        CellOrder::RowMajor => (0..rows)
            .flat_map(|row| (0..cols).map(move |col| GridPosition::new(row, col)))
            .collect(),
        CellOrder::Selected(cells) => cells.clone(),
    }
}

// =============================================================================
// Validation
// =============================================================================

pub(crate) fn validate_grid(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(TileError::Config(
            "Grid must have at least one row and one column".to_string(),
        ));
    }
    if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
        return Err(TileError::Config(format!(
            "Grid is limited to {} rows and {} columns",
            MAX_GRID_DIMENSION, MAX_GRID_DIMENSION
        )));
    }
    Ok(())
}

/// Page and canvas sizes must be positive, margin and overlap non-negative
fn validate_dimensions(request: &LayoutRequest) -> Result<()> {
    for (name, value) in [
        ("Page width", request.page_width),
        ("Page height", request.page_height),
        ("Canvas width", request.canvas_width),
        ("Canvas height", request.canvas_height),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(TileError::Config(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }
    for (name, value) in [("Margin", request.margin_pt), ("Overlap", request.overlap_pt)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(TileError::Config(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_fill_fraction(fill_fraction: f32) -> Result<()> {
    if !(fill_fraction > 0.0 && fill_fraction <= 1.0) {
        return Err(TileError::Config(format!(
            "Fill fraction must be in (0, 1], got {}",
            fill_fraction
        )));
    }
    Ok(())
}

/// Selected cells must be inside the grid and listed once
pub(crate) fn validate_cell_order(order: &CellOrder, rows: usize, cols: usize) -> Result<()> {
    let CellOrder::Selected(cells) = order else {
        return Ok(());
    };

    if cells.is_empty() {
        return Err(TileError::Config(
            "Cell selection must contain at least one cell".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for cell in cells {
        if cell.row >= rows || cell.col >= cols {
            return Err(TileError::Config(format!(
                "Cell (row {}, column {}) is outside the {}x{} grid",
                cell.row + 1,
                cell.col + 1,
                rows,
                cols
            )));
        }
        if !seen.insert(*cell) {
            return Err(TileError::Config(format!(
                "Cell (row {}, column {}) is selected more than once",
                cell.row + 1,
                cell.col + 1
            )));
        }
    }
    Ok(())
}
