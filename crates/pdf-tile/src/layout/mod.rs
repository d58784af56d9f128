//! Layout calculation modules for tiling
//!
//! This module handles all the geometric calculations, independent of
//! any PDF document:
//! - Page geometry (trimming, rotation, fitting)
//! - Grid layout (cell size, scale, centering, overlap, fill order)

mod geometry;
mod grid;
mod types;

pub use geometry::*;
pub use grid::{LayoutRequest, compute_layout, fill_order};
pub(crate) use grid::{validate_cell_order, validate_fill_fraction, validate_grid};
pub use types::*;
