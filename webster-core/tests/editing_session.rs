//! Integration test for a full editing session: place objects, edit with
//! undo/redo, save to a document, and reload it.

use webster_core::{
    parse_content, CanvasDocument, FilterKind, Frame, History, ObjectKind, ShapeType, Stage,
    StageObject, Transform,
};

/// Helper to create a product image object.
fn image_object(src: &str) -> StageObject {
    StageObject::new(ObjectKind::Image {
        src: src.to_string(),
        filters: webster_core::FilterChain::new(),
    })
}

/// Helper to create a headline text object.
fn headline(content: &str) -> StageObject {
    StageObject::new(ObjectKind::Text {
        content: content.to_string(),
        font_family: "Reem Kufi Fun".to_string(),
        font_size: 64.0,
        fill: "#222222".to_string(),
        align: webster_core::TextAlign::Center,
        font_style: webster_core::FontStyle::Bold,
        text_decoration: webster_core::TextDecoration::None,
        line_height: 1.1,
        web_font: true,
    })
}

#[test]
fn test_edit_save_reload_cycle() {
    let mut stage = Stage::new();
    let mut history = History::new();
    let frame = Frame::new(1080.0, 1920.0).expect("story frame");

    // Place a product shot, a price tag shape, and a headline.
    let photo = stage.add(image_object("/public/uploads/produtos/espresso.png"));
    history.record(&stage.ordered().into_iter().cloned().collect::<Vec<_>>());

    let tag = stage.add(
        StageObject::new(ObjectKind::Shape {
            shape: ShapeType::Star,
            fill: "#e63946".to_string(),
            stroke: "#ffffff".to_string(),
            stroke_width: 2.0,
            corner_radius: 0.0,
        })
        .with_z_index(2),
    );
    history.record(&stage.ordered().into_iter().cloned().collect::<Vec<_>>());

    stage.add(headline("Oferta da semana"));
    history.record(&stage.ordered().into_iter().cloned().collect::<Vec<_>>());

    // Tweak the image filters.
    if let Some(object) = stage.get_mut(photo) {
        if let ObjectKind::Image { filters, .. } = &mut object.kind {
            filters.enable(FilterKind::Brighten);
            filters.values_mut().set_brighten(0.2);
        }
    }

    // Undo the headline, then bring it back.
    let two_objects = history.undo().expect("undo headline");
    assert_eq!(two_objects.len(), 2);
    let three_objects = history.redo().expect("redo headline");
    assert_eq!(three_objects.len(), 3);

    // Multi-select and drag.
    stage.select(photo).expect("select photo");
    stage.select(tag).expect("select tag");
    let before = stage.get(tag).expect("tag").transform.x;
    stage.move_selected(25.0, 0.0);
    assert_eq!(stage.get(tag).expect("tag").transform.x, before + 25.0);
    assert!(stage.selection_bounds().is_some());

    // Save: serialize to the document the backend stores.
    let doc = CanvasDocument::from_stage("Weekly offer", "Story for Friday", &frame, &stage);
    let content_json = doc.content_json().expect("content JSON");

    // The API validates content strings with parse_content.
    let parsed = parse_content(&content_json).expect("valid content");
    assert_eq!(parsed.len(), 3);

    // Reload into a fresh editor.
    let (loaded_frame, loaded_stage) = doc.into_stage().expect("reload");
    assert_eq!(loaded_frame.width(), 1080.0);
    assert_eq!(loaded_frame.height(), 1920.0);
    assert_eq!(loaded_stage.object_count(), 3);
    assert!(loaded_stage.selected_ids().is_empty());

    // The star tag still sits on top of the photo.
    let order: Vec<_> = loaded_stage.ordered().iter().map(|o| o.id).collect();
    let photo_pos = order.iter().position(|id| *id == photo).expect("photo");
    let tag_pos = order.iter().position(|id| *id == tag).expect("tag");
    assert!(tag_pos > photo_pos);
}

#[test]
fn test_loaded_filters_survive_roundtrip() {
    let mut stage = Stage::new();
    let mut object = image_object("/public/uploads/produtos/latte.png");
    if let ObjectKind::Image { filters, .. } = &mut object.kind {
        filters.enable(FilterKind::Contrast);
        filters.enable(FilterKind::Grayscale);
        filters.values_mut().set_contrast(35.0);
    }
    stage.add(object.with_transform(Transform {
        x: 40.0,
        y: 80.0,
        ..Transform::default()
    }));

    let doc = CanvasDocument::from_stage("Menu", "", &Frame::default(), &stage);
    let json = doc.content_json().expect("serialize");
    let parsed = parse_content(&json).expect("parse");

    let ObjectKind::Image { filters, .. } = &parsed[0].kind else {
        panic!("expected image object");
    };
    assert!(filters.is_enabled(FilterKind::Contrast));
    assert!(filters.is_enabled(FilterKind::Grayscale));
    assert_eq!(filters.values().contrast(), 35.0);
}
