//! Layout data types for tiling
//!
//! These types represent the intermediate geometry between page
//! selection and PDF rendering. Coordinates are PDF user space:
//! origin at the bottom-left, y growing upward.

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners, in any order
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Grow by `amount` on every side
    pub fn expand(&self, amount: f32) -> Rect {
        self.inset(-amount)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the rectangle has no positive extent
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `other` lies inside this rectangle, within `tolerance`
    pub fn contains(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.top() <= self.top() + tolerance
    }
}

/// A PDF affine transformation `[a b c d e f]`.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`, the same
/// convention as the `cm` content stream operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Uniform scale followed by a translation
    pub fn scale_translate(scale: f32, tx: f32, ty: f32) -> Self {
        Self::new(scale, 0.0, 0.0, scale, tx, ty)
    }

    /// The transform that applies `self` first and `next` afterwards
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Transform a point
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Bounding box of a transformed rectangle
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply(rect.x, rect.y),
            self.apply(rect.right(), rect.y),
            self.apply(rect.x, rect.top()),
            self.apply(rect.right(), rect.top()),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);
        Rect::from_corners(min_x, min_y, max_x, max_y)
    }
}

/// One usable grid cell, in fill order
#[derive(Debug, Clone, PartialEq)]
pub struct CellSlot {
    /// Where the cell sits in the grid
    pub position: GridPosition,
    /// The cell itself on the sheet (already scaled)
    pub cell_rect: Rect,
    /// Where page content is painted: the cell grown by the overlap
    pub dest_rect: Rect,
}

/// Geometry of the tiled grid on the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Number of rows in the grid
    pub rows: usize,
    /// Number of columns in the grid
    pub cols: usize,
    /// Width of a trimmed page before scaling (points)
    pub cell_width_pt: f32,
    /// Height of a trimmed page before scaling (points)
    pub cell_height_pt: f32,
    /// Uniform scale applied to every cell
    pub scale: f32,
    /// Overlap added around each destination rectangle (points)
    pub overlap_pt: f32,
    /// Sheet width in points
    pub canvas_width_pt: f32,
    /// Sheet height in points
    pub canvas_height_pt: f32,
    /// Union of all cells, centered on the sheet
    pub grid_rect: Rect,
    /// Usable cells in fill order
    pub slots: Vec<CellSlot>,
}

impl GridLayout {
    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Scaled width of one cell
    pub fn scaled_cell_width(&self) -> f32 {
        self.cell_width_pt * self.scale
    }

    /// Scaled height of one cell
    pub fn scaled_cell_height(&self) -> f32 {
        self.cell_height_pt * self.scale
    }

    /// Sheet rectangle of the cell at `pos`
    pub fn cell_rect(&self, pos: GridPosition) -> Rect {
        let width = self.scaled_cell_width();
        let height = self.scaled_cell_height();
        Rect::new(
            self.grid_rect.x + pos.col as f32 * width,
            self.grid_rect.top() - (pos.row + 1) as f32 * height,
            width,
            height,
        )
    }
}
