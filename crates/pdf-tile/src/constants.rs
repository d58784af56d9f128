//! Shared constants for pattern tiling
//!
//! This module centralizes magic numbers and defaults used throughout
//! the tiling process.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert centimeters to points
#[inline]
pub fn cm_to_pt(cm: f32) -> f32 {
    mm_to_pt(cm * 10.0)
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Tiling Defaults
// =============================================================================

/// Margin removed from every side of a source page (centimeters)
pub const DEFAULT_MARGIN_CM: f32 = 1.0;

/// Fixed amount trimmed on top of the user margin (points).
/// Pattern pages usually carry a thin printer frame just inside the margin.
pub const DEFAULT_EXTRA_TRIM_PT: f32 = 10.0;

/// Overlap added around each tile (millimeters)
pub const DEFAULT_OVERLAP_MM: f32 = 2.0;

/// Default number of rows and columns
pub const DEFAULT_GRID: usize = 4;

/// Largest accepted number of rows or columns
pub const MAX_GRID_DIMENSION: usize = 20;

/// Share of the sheet the grid may occupy when scaling to fit
pub const DEFAULT_FILL_FRACTION: f32 = 0.95;

/// Geometric tolerance for comparisons (points)
pub const EPSILON_PT: f32 = 0.01;

// =============================================================================
// Calibration Square
// =============================================================================

/// Side length of the calibration square (centimeters)
pub const CALIBRATION_SQUARE_CM: f32 = 10.0;

/// Distance between the calibration square and the sheet edges (points)
pub const CALIBRATION_SQUARE_INSET: f32 = 20.0;

/// Stroke width of the calibration square (points)
pub const CALIBRATION_LINE_WIDTH: f32 = 2.0;

/// Font size of the calibration label (points)
pub const CALIBRATION_FONT_SIZE: f32 = 8.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;
