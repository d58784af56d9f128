//! Document I/O operations for tiling

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document from disk
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    load_pdf_bytes(bytes).await
}

/// Load a PDF document from an in-memory buffer (e.g. an upload)
pub async fn load_pdf_bytes(bytes: Vec<u8>) -> Result<Document> {
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save the tiled document to disk
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = save_pdf_bytes(doc).await?;
    log::info!("Saving {} bytes to {}", bytes.len(), path.display());
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Serialize the tiled document to bytes
pub async fn save_pdf_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, TileError>(writer)
    })
    .await??;
    Ok(bytes)
}

/// Number of pages in a document
pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}
