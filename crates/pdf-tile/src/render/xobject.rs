//! XObject creation for tiling
//!
//! This module handles creating Form XObjects from source PDF pages,
//! which are then placed onto the output sheet with transformations.
//! The XObject bounding box doubles as the clip that removes margins.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::layout::{PageGeometry, PageRotation, Rect};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Inherited page attributes are looked up at most this many levels up
const MAX_PAGE_TREE_DEPTH: usize = 32;

// =============================================================================
// XObject Creation
// =============================================================================

/// Create an XObject from a source page, clipped to `clip`.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `clip` - Visible area in the page's user space
/// * `cache` - Cache to avoid copying the same object multiple times
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    clip: &Rect,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    // Get page content
    let content_data = get_page_content(source, page_dict)?;

    // Create XObject dictionary
    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(clip.x),
            Object::Real(clip.y),
            Object::Real(clip.right()),
            Object::Real(clip.top()),
        ]),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    // Copy resources if present (possibly inherited from the page tree)
    if let Some(resources) = get_inherited(source, page_id, b"Resources")? {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, &resources, cache)?,
        );
    }

    // Create XObject with content stream
    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            // A reference may point at a single stream or at an array of streams
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            Object::Stream(stream) => Ok(stream_content(stream)),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_content(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

fn stream_content(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the ID before descending so reference cycles terminate
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                // Back-links into the source page tree must not be followed
                if key.as_slice() == b"Parent" {
                    continue;
                }
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

// =============================================================================
// Page Geometry
// =============================================================================

/// Read a page's effective box and rotation.
///
/// The effective box is the CropBox when present, otherwise the MediaBox.
/// Both, like `/Rotate`, may be inherited from ancestor page tree nodes.
pub fn get_page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let media_box = get_inherited(doc, page_id, b"MediaBox")?
        .and_then(|obj| rect_from_array(doc, &obj));
    let crop_box = get_inherited(doc, page_id, b"CropBox")?
        .and_then(|obj| rect_from_array(doc, &obj));

    let bbox = crop_box.or(media_box).unwrap_or_else(|| {
        log::warn!(
            "Page {:?} has no usable MediaBox; assuming US Letter",
            page_id
        );
        Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
    });

    let rotation = match get_inherited(doc, page_id, b"Rotate")? {
        Some(obj) => parse_rotation(&obj).unwrap_or_else(|| {
            log::warn!(
                "Page {:?} has unsupported rotation {:?}; ignoring it",
                page_id,
                obj
            );
            PageRotation::None
        }),
        None => PageRotation::None,
    };

    Ok(PageGeometry::new(bbox, rotation))
}

/// Interpret a `/Rotate` entry. Some writers store it as a real.
fn parse_rotation(obj: &Object) -> Option<PageRotation> {
    match obj {
        Object::Integer(degrees) => PageRotation::from_degrees(*degrees),
        Object::Real(degrees) if degrees.is_finite() && degrees.fract() == 0.0 => {
            PageRotation::from_degrees(*degrees as i64)
        }
        _ => None,
    }
}

/// Source page dimensions (width, height) in points, as displayed
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    Ok(get_page_geometry(doc, page_id)?.display_size())
}

/// Look up a page attribute, walking up the page tree if needed.
/// References are resolved.
fn get_inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut node_id = page_id;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let node = doc.get_dictionary(node_id)?;
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve(doc, value).clone()));
        }
        match node.get(b"Parent").and_then(|parent| parent.as_reference()) {
            Ok(parent_id) => node_id = parent_id,
            Err(_) => break,
        }
    }

    Ok(None)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Parse a `[x0 y0 x1 y1]` box
fn rect_from_array(doc: &Document, obj: &Object) -> Option<Rect> {
    let arr = obj.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (value, item) in values.iter_mut().zip(arr) {
        *value = extract_number(resolve(doc, item))?;
    }
    let rect = Rect::from_corners(values[0], values[1], values[2], values[3]);
    if rect.is_empty() { None } else { Some(rect) }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
