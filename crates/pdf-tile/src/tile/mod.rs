//! Pattern tiling - trimming pages and laying them out on one sheet
//!
//! This module orchestrates the tiling process:
//! 1. Select the requested page range
//! 2. Trim the margin from every page
//! 3. Lay the trimmed pages out on the grid
//! 4. Render the output sheet

mod io;
mod planning;
mod select;

pub use io::{load_pdf, load_pdf_bytes, page_count, save_pdf, save_pdf_bytes};
pub use planning::{PagePlacement, TilePlan, placement_matrix, plan};
pub use select::{SelectedPage, select_pages};

use crate::options::TileOptions;
use crate::render::render_sheet;
use crate::types::*;
use lopdf::{Dictionary, Document, Object};
use std::path::{Path, PathBuf};

/// Main tiling function
pub async fn tile(document: &Document, options: &TileOptions) -> Result<Document> {
    options.validate()?;

    let document = document.clone();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let plan = plan(&document, &options)?;
        render_plan(&document, &plan, &options)
    })
    .await?
}

/// Render a plan computed earlier with [`plan`] for the same document and options
pub async fn tile_planned(
    document: &Document,
    plan: &TilePlan,
    options: &TileOptions,
) -> Result<Document> {
    let document = document.clone();
    let plan = plan.clone();
    let options = options.clone();

    tokio::task::spawn_blocking(move || render_plan(&document, &plan, &options)).await?
}

/// Tile a PDF held in memory and return the serialized result
pub async fn tile_bytes(bytes: &[u8], options: &TileOptions) -> Result<Vec<u8>> {
    let document = load_pdf_bytes(bytes.to_vec()).await?;
    let tiled = tile(&document, options).await?;
    let output = save_pdf_bytes(tiled).await?;
    log::info!("Tiled PDF is {} bytes", output.len());
    Ok(output)
}

fn render_plan(source: &Document, plan: &TilePlan, options: &TileOptions) -> Result<Document> {
    // Build output document
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let page_id = render_sheet(&mut output, source, plan, pages_tree_id, options)?;

    // Create pages tree
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);

    log::info!(
        "Placed {} pages on the sheet ({} left out)",
        plan.placements.len(),
        plan.dropped_pages.len()
    );

    Ok(output)
}

/// Default output file next to the input: `<stem>_<PAPER>_no_margins.pdf`
pub fn default_output_path(input: impl AsRef<Path>, paper: PaperSize) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pattern".to_string());
    let file_name = format!("{}_{}_no_margins.pdf", stem, paper.label());
    match input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
