//! Output sheet rendering
//!
//! Builds the single output page: one XObject per placed source page,
//! drawn with its placement matrix, plus the optional calibration square.

use crate::constants::*;
use crate::layout::Matrix;
use crate::options::TileOptions;
use crate::tile::TilePlan;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

use super::xobject::create_page_xobject;

/// Text drawn inside the calibration square
const CALIBRATION_LABEL: &str = "Test square - 10 cm";

/// Render the tiled sheet into `output` and return the new page's ID.
pub fn render_sheet(
    output: &mut Document,
    source: &Document,
    plan: &TilePlan,
    parent_pages_id: ObjectId,
    options: &TileOptions,
) -> Result<ObjectId> {
    // Create page dictionary
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(plan.sheet_width_pt),
            Object::Real(plan.sheet_height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut fonts = Dictionary::new();
    let mut xobject_cache: HashMap<ObjectId, ObjectId> = HashMap::new();

    // Render each page placement
    for (idx, placement) in plan.placements.iter().enumerate() {
        let xobject_name = format!("P{}", idx);
        let xobject_id = create_page_xobject(
            output,
            source,
            placement.page_id,
            &placement.crop_rect,
            &mut xobject_cache,
        )?;
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        content_ops.push(generate_placement_command(&xobject_name, &placement.matrix));
    }

    if options.calibration_square {
        if (plan.layout.scale - 1.0).abs() > 1e-3 {
            log::warn!(
                "Grid is scaled by {:.3}; the calibration square shows sheet size, not pattern size",
                plan.layout.scale
            );
        }
        let (ops, font_id) = render_calibration_square(output, plan.sheet_width_pt);
        content_ops.push(ops);
        fonts.set("F1", Object::Reference(font_id));
    }

    // Set up resources
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    if !fonts.is_empty() {
        resources.set("Font", Object::Dictionary(fonts));
    }

    // Create content stream
    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Generate the PDF content stream command to place a page.
pub(crate) fn generate_placement_command(xobject_name: &str, m: &Matrix) -> String {
    format!(
        "q {} {} {} {} {} {} cm /{} Do Q\n",
        m.a, m.b, m.c, m.d, m.e, m.f, xobject_name
    )
}

/// Draw a square of known size near the bottom-right corner of the sheet,
/// with a centered label.
fn render_calibration_square(output: &mut Document, sheet_width_pt: f32) -> (String, ObjectId) {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let font_id = output.add_object(font_dict);

    let size = cm_to_pt(CALIBRATION_SQUARE_CM);
    let x = sheet_width_pt - size - CALIBRATION_SQUARE_INSET;
    let y = CALIBRATION_SQUARE_INSET;

    let text_width =
        CALIBRATION_LABEL.len() as f32 * CALIBRATION_FONT_SIZE * HELVETICA_CHAR_WIDTH_RATIO;
    let text_x = x + size / 2.0 - text_width / 2.0;
    let text_y = y + size / 2.0 - CALIBRATION_FONT_SIZE / 2.0;

    let ops = format!(
        "q 0 0 0 RG {} w {} {} {} {} re S Q\nBT /F1 {} Tf {} {} Td ({}) Tj ET\n",
        CALIBRATION_LINE_WIDTH,
        x,
        y,
        size,
        size,
        CALIBRATION_FONT_SIZE,
        text_x,
        text_y,
        CALIBRATION_LABEL
    );

    (ops, font_id)
}
