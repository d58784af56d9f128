//! PDF rendering modules for tiling
//!
//! This module handles all PDF-specific operations:
//! - Reading page boxes and rotation from source pages
//! - Creating clipped XObjects from source pages
//! - Building the tiled output sheet
//! - Deep copying PDF objects

mod sheet;
mod xobject;

pub use sheet::render_sheet;
pub use xobject::{get_page_dimensions, get_page_geometry};
