//! Page geometry: margin trimming, page rotation and fitting
//!
//! A source page is described by its effective box (CropBox or MediaBox)
//! and its `/Rotate` value. Trimming shrinks the box uniformly; the
//! display matrix then brings the trimmed area upright at the origin,
//! which is what a viewer would show.

use crate::types::{Result, TileError};

use super::{Matrix, Rect};

/// Page rotation as stored in the `/Rotate` entry (clockwise, on display)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl PageRotation {
    /// Interpret a `/Rotate` value. Returns `None` for values that are
    /// not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(PageRotation::None),
            90 => Some(PageRotation::Clockwise90),
            180 => Some(PageRotation::Clockwise180),
            270 => Some(PageRotation::Clockwise270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            PageRotation::None => 0,
            PageRotation::Clockwise90 => 90,
            PageRotation::Clockwise180 => 180,
            PageRotation::Clockwise270 => 270,
        }
    }

    /// Whether width and height trade places on display
    pub fn swaps_axes(self) -> bool {
        matches!(self, PageRotation::Clockwise90 | PageRotation::Clockwise270)
    }
}

/// Geometry of one source page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Effective page box in user space
    pub bbox: Rect,
    /// Display rotation
    pub rotation: PageRotation,
}

impl PageGeometry {
    pub fn new(bbox: Rect, rotation: PageRotation) -> Self {
        Self { bbox, rotation }
    }

    /// Displayed (width, height) of the untrimmed page
    pub fn display_size(&self) -> (f32, f32) {
        oriented_size(self.bbox.width, self.bbox.height, self.rotation)
    }

    /// The page box with `margin_pt` removed on every side.
    ///
    /// Margins are uniform, so trimming in user space equals trimming
    /// the displayed page regardless of rotation.
    pub fn crop_rect(&self, margin_pt: f32) -> Result<Rect> {
        let crop = self.bbox.inset(margin_pt);
        if crop.is_empty() {
            let (width_pt, height_pt) = self.display_size();
            return Err(TileError::MarginTooLarge {
                margin_pt,
                width_pt,
                height_pt,
            });
        }
        Ok(crop)
    }

    /// Displayed (width, height) of a rectangle cut from this page
    pub fn display_size_of(&self, crop: &Rect) -> (f32, f32) {
        oriented_size(crop.width, crop.height, self.rotation)
    }

    /// Matrix mapping `crop` (user space) onto `(0, 0)-(w, h)` in
    /// display orientation.
    pub fn display_matrix(&self, crop: &Rect) -> Matrix {
        let (x0, y0, x1, y1) = (crop.x, crop.y, crop.right(), crop.top());
        match self.rotation {
            PageRotation::None => Matrix::new(1.0, 0.0, 0.0, 1.0, -x0, -y0),
            PageRotation::Clockwise90 => Matrix::new(0.0, -1.0, 1.0, 0.0, -y0, x1),
            PageRotation::Clockwise180 => Matrix::new(-1.0, 0.0, 0.0, -1.0, x1, y1),
            PageRotation::Clockwise270 => Matrix::new(0.0, 1.0, -1.0, 0.0, y1, -x0),
        }
    }
}

fn oriented_size(width: f32, height: f32, rotation: PageRotation) -> (f32, f32) {
    if rotation.swaps_axes() {
        (height, width)
    } else {
        (width, height)
    }
}

/// Fit a `src_width` × `src_height` area into `dst`, preserving the
/// aspect ratio and centering the result.
///
/// Returns the uniform scale and the occupied rectangle.
pub fn fit_rect(src_width: f32, src_height: f32, dst: &Rect) -> (f32, Rect) {
    if src_width <= 0.0 || src_height <= 0.0 {
        return (1.0, Rect::new(dst.center_x(), dst.center_y(), 0.0, 0.0));
    }
    let scale = (dst.width / src_width).min(dst.height / src_height);
    let width = src_width * scale;
    let height = src_height * scale;
    (
        scale,
        Rect::new(
            dst.x + (dst.width - width) / 2.0,
            dst.y + (dst.height - height) / 2.0,
            width,
            height,
        ),
    )
}
