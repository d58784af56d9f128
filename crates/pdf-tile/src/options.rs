use crate::constants::*;
use crate::layout::{validate_cell_order, validate_fill_fraction, validate_grid};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID,
            cols: DEFAULT_GRID,
        }
    }
}

/// Complete tiling configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TileOptions {
    // Page selection
    pub page_range: PageRange,

    // Trimming
    /// Margin removed from every side of each page (centimeters)
    pub margin_cm: f32,
    /// Fixed trim added on top of the margin (points)
    pub extra_trim_pt: f32,

    // Grid
    pub grid: GridSize,
    /// Growth of every tile on each side (millimeters)
    pub overlap_mm: f32,
    pub cell_order: CellOrder,

    // Output sheet
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub scaling: ScalingMode,

    /// Draw a 10 cm square near the bottom-right corner to check print scale
    pub calibration_square: bool,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            page_range: PageRange::default(),
            margin_cm: DEFAULT_MARGIN_CM,
            extra_trim_pt: DEFAULT_EXTRA_TRIM_PT,
            grid: GridSize::default(),
            overlap_mm: DEFAULT_OVERLAP_MM,
            cell_order: CellOrder::RowMajor,
            paper_size: PaperSize::A0,
            orientation: Orientation::Portrait,
            scaling: ScalingMode::ActualSize,
            calibration_square: false,
        }
    }
}

impl TileOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| TileError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TileError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Total amount trimmed from each side of a page (points)
    pub fn margin_pt(&self) -> f32 {
        cm_to_pt(self.margin_cm) + self.extra_trim_pt
    }

    /// Overlap in points
    pub fn overlap_pt(&self) -> f32 {
        mm_to_pt(self.overlap_mm)
    }

    /// Output sheet size in points
    pub fn sheet_size_pt(&self) -> (f32, f32) {
        self.paper_size.dimensions_pt(self.orientation)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.page_range.start == 0 {
            return Err(TileError::Config("Page numbers start at 1".to_string()));
        }
        if let Some(end) = self.page_range.end {
            if self.page_range.start > end {
                return Err(TileError::Config(format!(
                    "Start page ({}) must not be after end page ({})",
                    self.page_range.start, end
                )));
            }
        }

        for (name, value) in [
            ("Margin", self.margin_cm),
            ("Extra trim", self.extra_trim_pt),
            ("Overlap", self.overlap_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TileError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        validate_grid(self.grid.rows, self.grid.cols)?;
        validate_cell_order(&self.cell_order, self.grid.rows, self.grid.cols)?;

        if let ScalingMode::Fit { fill_fraction } = self.scaling {
            validate_fill_fraction(fill_fraction)?;
        }

        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            let valid = |value: f32| value.is_finite() && value > 0.0;
            if !(valid(width_mm) && valid(height_mm)) {
                return Err(TileError::Config(format!(
                    "Custom paper size must be positive, got {}x{}mm",
                    width_mm, height_mm
                )));
            }
        }

        Ok(())
    }
}
