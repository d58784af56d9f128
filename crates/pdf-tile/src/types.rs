use crate::constants::{DEFAULT_FILL_FRACTION, mm_to_pt};
use crate::layout::GridPosition;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to tile")]
    NoPages,
    #[error("No pages found between page {start} and page {end} (document has {page_count} pages)")]
    EmptyPageRange {
        start: usize,
        end: usize,
        page_count: usize,
    },
    #[error(
        "Margin of {margin_pt:.1}pt leaves nothing of a {width_pt:.1}x{height_pt:.1}pt page"
    )]
    MarginTooLarge {
        margin_pt: f32,
        width_pt: f32,
        height_pt: f32,
    },
}

pub type Result<T> = std::result::Result<T, TileError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Output sheet sizes. The large ISO sizes are the ones plotters and
/// copy shops print patterns on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    #[default]
    A0,
    A1,
    A2,
    A3,
    A4,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A0 => (841.0, 1189.0),
            PaperSize::A1 => (594.0, 841.0),
            PaperSize::A2 => (420.0, 594.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Sheet dimensions in points with orientation applied
    pub fn dimensions_pt(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_with_orientation(orientation);
        (mm_to_pt(w), mm_to_pt(h))
    }

    /// Short name used in file names and messages
    pub fn label(self) -> String {
        match self {
            PaperSize::A0 => "A0".to_string(),
            PaperSize::A1 => "A1".to_string(),
            PaperSize::A2 => "A2".to_string(),
            PaperSize::A3 => "A3".to_string(),
            PaperSize::A4 => "A4".to_string(),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => format!("{}x{}mm", width_mm.round(), height_mm.round()),
        }
    }
}

/// How the tiled grid is sized on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Keep pages at their printed size. A grid larger than the sheet
    /// runs off the right and bottom edges.
    #[default]
    ActualSize,
    /// Uniformly scale the grid so it fills at most `fill_fraction`
    /// of the sheet in both directions (may shrink or grow).
    Fit { fill_fraction: f32 },
}

impl ScalingMode {
    /// Scale-to-fit with the default fill fraction
    pub fn fit() -> Self {
        ScalingMode::Fit {
            fill_fraction: DEFAULT_FILL_FRACTION,
        }
    }
}

/// Order in which consecutive pages fill grid cells
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellOrder {
    /// Left to right, top to bottom
    #[default]
    RowMajor,
    /// Only the listed cells are used, in list order. Other cells stay blank.
    Selected(Vec<GridPosition>),
}

/// Inclusive, 1-based page range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRange {
    /// First page to extract (1-based)
    pub start: usize,
    /// Last page to extract (inclusive); `None` means the last page of the document
    pub end: Option<usize>,
}

impl Default for PageRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

impl PageRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Resolve the open end against a document's page count
    pub fn resolved_end(&self, page_count: usize) -> usize {
        self.end.unwrap_or(page_count)
    }
}

/// Statistics about a tiling run
#[derive(Debug, Clone, PartialEq)]
pub struct TileStatistics {
    /// Total number of pages in the source document
    pub source_pages: usize,
    /// Pages inside the requested range
    pub selected_pages: usize,
    /// Pages that received a cell
    pub placed_pages: usize,
    /// Selected pages left out because the grid was full
    pub dropped_pages: usize,
    /// Number of cells in the grid
    pub grid_cells: usize,
    /// Cells left blank
    pub empty_cells: usize,
    /// Uniform scale applied to every cell
    pub scale: f32,
    /// Size of one trimmed page on the sheet (mm)
    pub cell_size_mm: (f32, f32),
    /// Size of the full grid on the sheet (mm)
    pub grid_size_mm: (f32, f32),
    /// Size of the output sheet (mm)
    pub sheet_size_mm: (f32, f32),
}
