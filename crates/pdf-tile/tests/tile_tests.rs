use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_tile::layout::{GridPosition, PageRotation, Rect};
use pdf_tile::*;

const A4_WIDTH: i64 = 595;
const A4_HEIGHT: i64 = 842;

/// Build a document whose pages have the given MediaBox sizes and rotations
fn create_pdf_with_pages(pages: &[(i64, i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    // Create pages array
    let mut kids = Vec::new();
    for &(width, height, rotate) in pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"0 0 1 rg 50 50 100 100 re f".to_vec(),
        ));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        if rotate != 0 {
            page.set("Rotate", Object::Integer(rotate));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    // Create pages dict
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(pages.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn create_test_pdf(num_pages: usize) -> Document {
    create_pdf_with_pages(&vec![(A4_WIDTH, A4_HEIGHT, 0); num_pages])
}

fn only_page(doc: &Document) -> ObjectId {
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    *pages.values().next().unwrap()
}

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("Expected number, got {:?}", other),
    }
}

fn xobject_names(doc: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    xobjects.iter().map(|(name, _)| name.clone()).collect()
}

fn xobject_bbox(doc: &Document, page_id: ObjectId, name: &[u8]) -> Vec<f32> {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let id = xobjects.get(name).unwrap().as_reference().unwrap();
    let stream = doc.get_object(id).unwrap().as_stream().unwrap();
    stream
        .dict
        .get(b"BBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(number)
        .collect()
}

fn count_draws(doc: &Document, page_id: ObjectId) -> usize {
    let content = doc.get_page_content(page_id).unwrap();
    String::from_utf8_lossy(&content).matches(" Do Q").count()
}

#[tokio::test]
async fn test_load_pdf() {
    use tempfile::NamedTempFile;

    let mut doc = create_test_pdf(5);
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path();

    // Save test PDF
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();

    // Load it back
    let loaded = load_pdf(path).await.unwrap();
    assert_eq!(page_count(&loaded), 5);
}

#[tokio::test]
async fn test_save_pdf() {
    use tempfile::NamedTempFile;

    let doc = create_test_pdf(2);
    let temp = NamedTempFile::new().unwrap();

    save_pdf(doc, temp.path()).await.unwrap();

    // Verify file was created and can be loaded
    assert!(temp.path().exists());
    let loaded = Document::load(temp.path()).unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
}

#[tokio::test]
async fn test_tile_produces_single_sheet() {
    let doc = create_test_pdf(16);
    let options = TileOptions::default();

    let output = tile(&doc, &options).await.unwrap();
    let page_id = only_page(&output);

    // MediaBox is A0 portrait
    let page = output.get_dictionary(page_id).unwrap();
    let media_box: Vec<f32> = page
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(number)
        .collect();
    assert!((media_box[2] - 2383.94).abs() < 0.1);
    assert!((media_box[3] - 3370.39).abs() < 0.1);

    // One XObject and one draw per page
    assert_eq!(xobject_names(&output, page_id).len(), 16);
    assert_eq!(count_draws(&output, page_id), 16);
}

#[tokio::test]
async fn test_xobject_clips_to_trimmed_page() {
    let doc = create_test_pdf(1);
    let options = TileOptions::default();
    let margin = options.margin_pt();

    let output = tile(&doc, &options).await.unwrap();
    let page_id = only_page(&output);

    let bbox = xobject_bbox(&output, page_id, b"P0");
    let expected = [
        margin,
        margin,
        A4_WIDTH as f32 - margin,
        A4_HEIGHT as f32 - margin,
    ];
    for (actual, expected) in bbox.iter().zip(expected) {
        assert!((actual - expected).abs() < 0.01, "{:?}", bbox);
    }
}

#[tokio::test]
async fn test_page_range_selects_subset() {
    let doc = create_test_pdf(22);
    let options = TileOptions {
        page_range: PageRange::new(8, 22),
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    assert_eq!(plan.selected_pages, 15);
    assert_eq!(plan.placements.len(), 15);
    assert_eq!(plan.placements[0].page_number, 8);
    assert_eq!(plan.placements[14].page_number, 22);
    assert_eq!(plan.placements[14].position, GridPosition::new(3, 2));

    let output = tile(&doc, &options).await.unwrap();
    assert_eq!(count_draws(&output, only_page(&output)), 15);
}

#[tokio::test]
async fn test_sparse_placement_leaves_top_right_blank() {
    let doc = create_test_pdf(15);
    let cells: Vec<GridPosition> = (0..4)
        .flat_map(|row| (0..4).map(move |col| GridPosition::new(row, col)))
        .filter(|pos| !(pos.row == 0 && pos.col == 3))
        .collect();
    let options = TileOptions {
        cell_order: CellOrder::Selected(cells),
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    assert_eq!(plan.placements.len(), 15);
    assert!(
        plan.placements
            .iter()
            .all(|p| p.position != GridPosition::new(0, 3))
    );
    assert_eq!(plan.placements[3].position, GridPosition::new(1, 0));
    assert!(plan.dropped_pages.is_empty());
}

#[test]
fn test_extra_pages_are_dropped() {
    let doc = create_test_pdf(6);
    let options = TileOptions {
        grid: GridSize { rows: 2, cols: 2 },
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    assert_eq!(plan.placements.len(), 4);
    assert_eq!(plan.dropped_pages, vec![5, 6]);
}

#[test]
fn test_placements_fill_destination_without_overlap() {
    let doc = create_test_pdf(4);
    let options = TileOptions {
        grid: GridSize { rows: 2, cols: 2 },
        overlap_mm: 0.0,
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    for placement in &plan.placements {
        let content = placement.content_rect;
        let dest = placement.dest_rect;
        assert!((content.x - dest.x).abs() < 0.01);
        assert!((content.y - dest.y).abs() < 0.01);
        assert!((content.width - dest.width).abs() < 0.01);
        assert!((content.height - dest.height).abs() < 0.01);
    }

    // Row 0 is the top row
    assert!(plan.placements[0].dest_rect.y > plan.placements[2].dest_rect.y);
    assert!(plan.placements[0].dest_rect.x < plan.placements[1].dest_rect.x);
}

#[test]
fn test_overlap_enlarges_painted_area() {
    let doc = create_test_pdf(1);
    let options = TileOptions::default();

    let plan = plan(&doc, &options).unwrap();
    let placement = &plan.placements[0];
    let cell_width = plan.layout.cell_width_pt;
    assert!(placement.dest_rect.width > cell_width);
    assert!(placement.content_rect.width > cell_width);
    assert!(!plan.layout.grid_rect.contains(&placement.content_rect, 0.01));
}

#[test]
fn test_rotated_page_is_placed_upright() {
    // Second page is stored landscape but displayed portrait
    let doc = create_pdf_with_pages(&[(595, 842, 0), (842, 595, 90), (842, 595, 270)]);
    let options = TileOptions {
        grid: GridSize { rows: 1, cols: 3 },
        overlap_mm: 0.0,
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    assert_eq!(plan.placements.len(), 3);
    for placement in &plan.placements {
        let content = placement.content_rect;
        let dest = placement.dest_rect;
        assert!((content.width - dest.width).abs() < 0.01);
        assert!((content.height - dest.height).abs() < 0.01);
        assert!((content.x - dest.x).abs() < 0.01);
    }

    let geometry = get_page_geometry(&doc, plan.placements[1].page_id).unwrap();
    assert_eq!(geometry.rotation, PageRotation::Clockwise90);
}

#[test]
fn test_smaller_page_is_centered_in_cell() {
    let doc = create_pdf_with_pages(&[(595, 842, 0), (400, 842, 0)]);
    let options = TileOptions {
        grid: GridSize { rows: 1, cols: 2 },
        overlap_mm: 0.0,
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    let narrow = &plan.placements[1];
    assert!(narrow.content_rect.width < narrow.dest_rect.width);
    assert!((narrow.content_rect.height - narrow.dest_rect.height).abs() < 0.01);
    assert!((narrow.content_rect.center_x() - narrow.dest_rect.center_x()).abs() < 0.01);
}

#[test]
fn test_inherited_media_box() {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
    ]));
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(420.5),
                    Object::Integer(600),
                ]),
            ),
            ("Rotate", Object::Integer(180)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let geometry = get_page_geometry(&doc, page_id).unwrap();
    assert_eq!(geometry.bbox, Rect::new(0.0, 0.0, 420.5, 600.0));
    assert_eq!(geometry.rotation, PageRotation::Clockwise180);
    assert_eq!(get_page_dimensions(&doc, page_id).unwrap(), (420.5, 600.0));
}

#[tokio::test]
async fn test_tile_errors() {
    let doc = create_test_pdf(0);
    match tile(&doc, &TileOptions::default()).await {
        Err(TileError::NoPages) => {}
        other => panic!("Expected NoPages error, got {:?}", other.map(|_| ())),
    }

    let doc = create_test_pdf(3);
    let options = TileOptions {
        page_range: PageRange::new(5, 8),
        ..Default::default()
    };
    match tile(&doc, &options).await {
        Err(TileError::EmptyPageRange { page_count, .. }) => assert_eq!(page_count, 3),
        other => panic!("Expected EmptyPageRange error, got {:?}", other.map(|_| ())),
    }

    let options = TileOptions {
        margin_cm: 12.0,
        ..Default::default()
    };
    match tile(&doc, &options).await {
        Err(TileError::MarginTooLarge { .. }) => {}
        other => panic!("Expected MarginTooLarge error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_tile_bytes_round_trip() {
    let mut doc = create_test_pdf(4);
    let mut input = Vec::new();
    doc.save_to(&mut input).unwrap();

    let options = TileOptions {
        paper_size: PaperSize::A1,
        orientation: Orientation::Landscape,
        scaling: ScalingMode::fit(),
        grid: GridSize { rows: 2, cols: 2 },
        ..Default::default()
    };
    let output = tile_bytes(&input, &options).await.unwrap();
    assert!(output.starts_with(b"%PDF-1.7"));

    let loaded = load_pdf_bytes(output).await.unwrap();
    let page_id = only_page(&loaded);
    assert_eq!(count_draws(&loaded, page_id), 4);

    let page = loaded.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    // A1 landscape: 841 x 594 mm
    assert!((number(&media_box[2]) - 2383.94).abs() < 0.1);
    assert!((number(&media_box[3]) - 1683.78).abs() < 0.1);
}

#[tokio::test]
async fn test_calibration_square() {
    let doc = create_test_pdf(2);
    let options = TileOptions {
        calibration_square: true,
        ..Default::default()
    };

    let output = tile(&doc, &options).await.unwrap();
    let page_id = only_page(&output);
    let content = String::from_utf8_lossy(&output.get_page_content(page_id).unwrap()).into_owned();
    assert!(content.contains(" re S Q"));
    assert!(content.contains("(Test square - 10 cm) Tj"));

    let page = output.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    assert!(resources.get(b"Font").is_ok());
}

#[tokio::test]
async fn test_shared_resources_copied_once() {
    let mut doc = create_test_pdf(3);

    // Give every page the same font resource by reference
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let fonts = Dictionary::from_iter(vec![("F1", Object::Reference(font_id))]);
        let resources = Dictionary::from_iter(vec![("Font", Object::Dictionary(fonts))]);
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("Resources", Object::Dictionary(resources));
    }

    let output = tile(&doc, &TileOptions::default()).await.unwrap();
    let helvetica_fonts = output
        .objects
        .values()
        .filter(|obj| {
            obj.as_dict()
                .and_then(|d| d.get(b"BaseFont"))
                .and_then(|name| name.as_name())
                .map(|name| name == b"Helvetica")
                .unwrap_or(false)
        })
        .count();
    assert_eq!(helvetica_fonts, 1);
}

#[test]
fn test_dropped_page_is_not_trimmed() {
    // The third page is too small for the margin but never receives a cell
    let doc = create_pdf_with_pages(&[(595, 842, 0), (595, 842, 0), (60, 60, 0)]);
    let options = TileOptions {
        grid: GridSize { rows: 1, cols: 2 },
        ..Default::default()
    };

    let tiling = plan(&doc, &options).unwrap();
    assert_eq!(tiling.placements.len(), 2);
    assert_eq!(tiling.dropped_pages, vec![3]);

    // A placed page that is too small still fails
    let options = TileOptions {
        grid: GridSize { rows: 1, cols: 3 },
        ..Default::default()
    };
    assert!(matches!(
        plan(&doc, &options),
        Err(TileError::MarginTooLarge { .. })
    ));
}

#[tokio::test]
async fn test_tile_planned_matches_tile() {
    let doc = create_test_pdf(6);
    let options = TileOptions {
        grid: GridSize { rows: 2, cols: 2 },
        ..Default::default()
    };

    let plan = plan(&doc, &options).unwrap();
    let stats = plan_statistics(&plan, &options);
    assert_eq!(stats, calculate_statistics(&doc, &options).unwrap());
    assert_eq!(stats.dropped_pages, 2);

    let planned = tile_planned(&doc, &plan, &options).await.unwrap();
    let direct = tile(&doc, &options).await.unwrap();
    assert_eq!(output_content(&planned), output_content(&direct));
}

fn output_content(doc: &Document) -> Vec<u8> {
    doc.get_page_content(only_page(doc)).unwrap()
}

#[test]
fn test_real_rotate_value() {
    let mut doc = create_pdf_with_pages(&[(842, 595, 0)]);
    let page_id = *doc.get_pages().values().next().unwrap();
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Rotate", Object::Real(90.0));

    let geometry = get_page_geometry(&doc, page_id).unwrap();
    assert_eq!(geometry.rotation, PageRotation::Clockwise90);
    assert_eq!(get_page_dimensions(&doc, page_id).unwrap(), (595.0, 842.0));
}

#[tokio::test]
async fn test_infinite_custom_paper_is_rejected() {
    let mut doc = create_test_pdf(2);
    let mut input = Vec::new();
    doc.save_to(&mut input).unwrap();

    let options = TileOptions {
        paper_size: PaperSize::Custom {
            width_mm: f32::INFINITY,
            height_mm: 1000.0,
        },
        scaling: ScalingMode::fit(),
        ..Default::default()
    };
    assert!(matches!(
        tile_bytes(&input, &options).await,
        Err(TileError::Config(_))
    ));
}
