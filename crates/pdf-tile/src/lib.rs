pub mod constants;
pub mod layout;
mod options;
mod render;
mod stats;
pub mod tile;
mod types;

pub use options::*;
pub use render::{get_page_dimensions, get_page_geometry};
pub use stats::{calculate_statistics, plan_statistics};
pub use tile::{
    PagePlacement, TilePlan, default_output_path, load_pdf, load_pdf_bytes, page_count, plan,
    save_pdf, save_pdf_bytes, tile, tile_bytes, tile_planned,
};
pub use types::*;
