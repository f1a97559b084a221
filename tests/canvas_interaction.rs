use egui::{Color32, pos2};
use image::RgbaImage;
use overlay_editor::canvas::{Canvas, CropHandle, Gesture, Mode};
use overlay_editor::element::{DrawingObject, TextProperties};
use overlay_editor::error::EditorError;

/// 400x300 raster shown 1:1 in a view of the same size.
fn canvas() -> Canvas {
    let mut canvas = Canvas::new();
    canvas.load_image(RgbaImage::from_pixel(400, 300, image::Rgba([255, 255, 255, 255])));
    canvas.fit_to_view(400.0, 300.0);
    canvas
}

fn drag(canvas: &mut Canvas, from: (f32, f32), to: (f32, f32)) {
    canvas.on_pointer_down(pos2(from.0, from.1));
    canvas.on_pointer_move(pos2((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    canvas.on_pointer_up(pos2(to.0, to.1));
}

#[test]
fn test_draw_rectangle_commits_on_release() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    canvas.set_brush(Color32::RED, 3.0);
    canvas.on_pointer_down(pos2(10.0, 10.0));
    canvas.on_pointer_move(pos2(50.0, 30.0));
    assert!(canvas.in_progress().is_some());
    assert!(canvas.overlay().is_empty());

    canvas.on_pointer_up(pos2(50.0, 30.0));
    assert!(canvas.in_progress().is_none());
    assert_eq!(canvas.overlay().len(), 1);
    let object = &canvas.overlay().objects()[0];
    assert_eq!(object.anchor_points(), (pos2(10.0, 10.0), pos2(50.0, 30.0)));
    assert_eq!(object.color(), Color32::RED);
    assert!(canvas.can_undo());
}

#[test]
fn test_line_records_path() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Line);
    canvas.on_pointer_down(pos2(0.0, 0.0));
    canvas.on_pointer_move(pos2(10.0, 0.0));
    canvas.on_pointer_move(pos2(10.0, 10.0));
    canvas.on_pointer_up(pos2(20.0, 10.0));
    match &canvas.overlay().objects()[0] {
        DrawingObject::Line(line) => assert_eq!(
            line.points(),
            &[pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0), pos2(20.0, 10.0)]
        ),
        other => panic!("expected a line, got {:?}", other),
    }
}

#[test]
fn test_pointer_is_clamped_to_raster() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Ellipse);
    drag(&mut canvas, (-50.0, -50.0), (900.0, 900.0));
    let object = &canvas.overlay().objects()[0];
    assert_eq!(object.anchor_points(), (pos2(0.0, 0.0), pos2(400.0, 300.0)));
}

#[test]
fn test_text_is_placed_on_tap() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Text);
    canvas.on_pointer_down(pos2(30.0, 30.0));
    canvas.on_pointer_up(pos2(30.0, 30.0));
    assert!(canvas.overlay().is_empty(), "no pending text, nothing placed");

    canvas.set_text_properties(TextProperties {
        text: "Hello".to_owned(),
        ..Default::default()
    });
    canvas.on_pointer_down(pos2(30.0, 60.0));
    assert_eq!(canvas.overlay().len(), 1);
    assert_eq!(canvas.gesture(), &Gesture::Idle);
    canvas.on_pointer_up(pos2(80.0, 90.0));
    assert_eq!(canvas.overlay().objects()[0].start(), pos2(30.0, 60.0));
}

#[test]
fn test_select_and_drag_topmost_object() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    drag(&mut canvas, (10.0, 10.0), (110.0, 110.0));
    drag(&mut canvas, (10.0, 10.0), (110.0, 110.0));
    let top = canvas.overlay().objects()[1].id();
    let bottom = canvas.overlay().objects()[0].id();

    canvas.set_mode(Mode::None);
    canvas.on_pointer_down(pos2(10.0, 60.0));
    assert_eq!(canvas.selected(), Some(top));
    canvas.on_pointer_move(pos2(20.0, 65.0));
    canvas.on_pointer_up(pos2(30.0, 70.0));

    let moved = canvas.overlay().get(top).unwrap();
    assert_eq!(moved.start(), pos2(30.0, 20.0));
    assert_eq!(canvas.overlay().get(bottom).unwrap().start(), pos2(10.0, 10.0));
    // Dragging is not a history entry.
    assert_eq!(canvas.history().undo_len(), 2);
}

#[test]
fn test_press_on_empty_space_clears_selection() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    drag(&mut canvas, (10.0, 10.0), (110.0, 110.0));
    canvas.set_mode(Mode::None);
    canvas.on_pointer_down(pos2(10.0, 60.0));
    canvas.on_pointer_up(pos2(10.0, 60.0));
    assert!(canvas.selected().is_some());
    canvas.on_pointer_down(pos2(300.0, 250.0));
    canvas.on_pointer_up(pos2(300.0, 250.0));
    assert!(canvas.selected().is_none());
}

#[test]
fn test_delete_selected_is_undoable() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    drag(&mut canvas, (10.0, 10.0), (110.0, 110.0));
    canvas.set_mode(Mode::None);
    canvas.on_pointer_down(pos2(10.0, 60.0));
    canvas.on_pointer_up(pos2(10.0, 60.0));

    assert!(canvas.delete_selected());
    assert!(canvas.overlay().is_empty());
    assert!(!canvas.delete_selected());
    canvas.undo();
    assert_eq!(canvas.overlay().len(), 1);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Line);
    for i in 0..3 {
        let y = 20.0 + i as f32 * 30.0;
        drag(&mut canvas, (10.0, y), (200.0, y));
    }
    let before = canvas.overlay().clone();
    canvas.undo();
    assert_eq!(canvas.overlay().len(), 2);
    canvas.redo();
    assert_eq!(canvas.overlay(), &before);
}

#[test]
fn test_new_object_after_undo_clears_redo() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    for i in 0..3 {
        let x = 10.0 + i as f32 * 40.0;
        drag(&mut canvas, (x, 10.0), (x + 30.0, 40.0));
    }
    canvas.undo();
    canvas.undo();
    assert!(canvas.can_redo());
    drag(&mut canvas, (10.0, 100.0), (50.0, 150.0));
    assert!(!canvas.can_redo());
    assert_eq!(canvas.overlay().len(), 2);
}

#[test]
fn test_history_calls_on_empty_history_are_noops() {
    let mut canvas = canvas();
    let revision = canvas.revision();
    canvas.undo();
    canvas.redo();
    assert_eq!(canvas.revision(), revision);
}

#[test]
fn test_crop_region_manipulation() {
    let mut canvas = canvas();
    canvas.start_crop();
    assert!(canvas.is_crop_active());
    assert_eq!(canvas.crop_region().unwrap().rect(), canvas.raster_view_rect());

    // Grab the top-left corner and pull it in.
    canvas.on_pointer_down(pos2(3.0, 3.0));
    assert!(matches!(
        canvas.gesture(),
        Gesture::Cropping { handle: CropHandle::TopLeft, .. }
    ));
    canvas.on_pointer_up(pos2(100.0, 50.0));
    let rect = canvas.crop_region().unwrap().rect();
    assert_eq!(rect.min, pos2(100.0, 50.0));
    assert_eq!(rect.max, pos2(400.0, 300.0));

    // Move the whole region.
    canvas.on_pointer_down(pos2(250.0, 175.0));
    canvas.on_pointer_up(pos2(200.0, 175.0));
    let rect = canvas.crop_region().unwrap().rect();
    assert_eq!(rect.min, pos2(50.0, 50.0));
}

#[test]
fn test_tiny_crop_region_is_discarded() {
    let mut canvas = canvas();
    canvas.start_crop();
    canvas.on_pointer_down(pos2(399.0, 299.0));
    canvas.on_pointer_up(pos2(150.0, 150.0));
    // Outside every handle of the shrunk region: starts a new one.
    canvas.on_pointer_down(pos2(300.0, 250.0));
    canvas.on_pointer_up(pos2(305.0, 290.0));
    assert!(canvas.crop_region().is_none());
    assert!(canvas.is_crop_active());
    assert_eq!(canvas.apply_crop(), Err(EditorError::NoCropRegion));
}

#[test]
fn test_new_crop_region_normalizes() {
    let mut canvas = canvas();
    canvas.start_crop();
    canvas.cancel_crop();
    assert!(!canvas.is_crop_active());
    assert_eq!(canvas.apply_crop(), Err(EditorError::NoCropRegion));

    canvas.set_mode(Mode::Crop);
    // Shrink the default region so a press elsewhere starts a fresh one.
    canvas.on_pointer_down(pos2(399.0, 299.0));
    canvas.on_pointer_up(pos2(100.0, 100.0));
    canvas.on_pointer_down(pos2(300.0, 250.0));
    canvas.on_pointer_up(pos2(200.0, 150.0));
    let rect = canvas.crop_region().unwrap().rect();
    assert_eq!(rect.min, pos2(200.0, 150.0));
    assert_eq!(rect.max, pos2(300.0, 250.0));
}

#[test]
fn test_switching_mode_discards_crop_and_in_progress() {
    let mut canvas = canvas();
    canvas.set_mode(Mode::Rectangle);
    canvas.on_pointer_down(pos2(10.0, 10.0));
    canvas.on_pointer_move(pos2(30.0, 30.0));
    canvas.set_mode(Mode::Crop);
    assert!(canvas.in_progress().is_none());
    assert!(canvas.overlay().is_empty());
    assert!(canvas.crop_region().is_some());

    canvas.set_mode(Mode::Line);
    assert!(canvas.crop_region().is_none());
    assert_eq!(canvas.mode(), Mode::Line);
}

#[test]
fn test_load_raster_validates_length() {
    let mut canvas = Canvas::new();
    assert_eq!(
        canvas.load_raster(vec![0; 10], 2, 2),
        Err(EditorError::InvalidRaster { expected: 16, actual: 10 })
    );
    assert!(canvas.raster().is_none());
    canvas.load_raster(vec![0; 16], 2, 2).unwrap();
    assert_eq!(canvas.raster().map(|r| r.dimensions()), Some((2, 2)));
}

#[test]
fn test_pointer_without_raster_is_ignored() {
    let mut canvas = Canvas::new();
    canvas.set_mode(Mode::Rectangle);
    canvas.on_pointer_down(pos2(1.0, 1.0));
    canvas.on_pointer_up(pos2(5.0, 5.0));
    assert!(canvas.overlay().is_empty());
    assert_eq!(canvas.rotate(90), Err(EditorError::NoRaster));
    assert!(canvas.export_flattened_raster().is_err());
}
