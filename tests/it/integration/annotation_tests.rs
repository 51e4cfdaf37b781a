//! Annotating an open document end-to-end.

use crate::helpers::{
    assert_object_count, drawables, editor_with_image, handle, surface,
};
use docmark::color::Color;
use docmark::export::ExportFormat;
use docmark::input::PointerOutcome;
use docmark::types::{DrawableKind, Tool};

#[test]
fn test_rectangle_takes_active_color_at_creation() {
    let mut editor = editor_with_image((400, 300));
    editor.set_tool(Tool::Rectangle);
    editor.set_color(Color::rgb(255, 0, 0));

    editor.pointer_down((10.0, 10.0)).unwrap();
    editor.pointer_up((80.0, 60.0)).unwrap();
    editor.set_color(Color::rgb(0, 255, 0));

    let rect = &drawables(&editor)[0];
    assert_eq!(rect.color(), Some(Color::rgb(255, 0, 0)));
    assert_eq!(rect.position, (10.0, 10.0));
    assert_eq!(rect.size(), (70.0, 50.0));

    // A later shape picks up the new color; the first keeps its own.
    editor.pointer_down((100.0, 100.0)).unwrap();
    editor.pointer_up((100.0, 100.0)).unwrap();
    let colors: Vec<_> = drawables(&editor).iter().map(|d| d.color()).collect();
    assert_eq!(
        colors,
        vec![Some(Color::rgb(255, 0, 0)), Some(Color::rgb(0, 255, 0))]
    );
}

#[test]
fn test_stroke_points_are_kept_exactly() {
    let mut editor = editor_with_image((400, 300));
    editor.set_tool(Tool::Draw);

    editor.pointer_down((0.0, 0.0)).unwrap();
    editor.pointer_move((10.0, 10.0)).unwrap();
    editor.pointer_move((20.0, 5.0)).unwrap();
    let outcome = editor.pointer_up((20.0, 5.0)).unwrap();

    assert!(matches!(outcome, PointerOutcome::StrokeCommitted(_)));
    let shown = drawables(&editor);
    assert_eq!(shown.len(), 1);
    let DrawableKind::FreehandStroke { points, .. } = &shown[0].kind else {
        panic!("expected a stroke");
    };
    assert_eq!(points, &vec![(0.0, 0.0), (10.0, 10.0), (20.0, 5.0)]);
}

#[test]
fn test_click_without_movement_commits_no_stroke() {
    let mut editor = editor_with_image((400, 300));
    editor.set_tool(Tool::Draw);

    editor.pointer_down((50.0, 50.0)).unwrap();
    let outcome = editor.pointer_up((50.0, 50.0)).unwrap();

    assert_eq!(outcome, PointerOutcome::StrokeDiscarded);
    assert_object_count(&editor, 0);
}

#[test]
fn test_surface_untouched_until_stroke_ends() {
    let mut editor = editor_with_image((400, 300));
    editor.set_tool(Tool::Draw);
    editor.render().unwrap();

    editor.pointer_down((0.0, 0.0)).unwrap();
    editor.pointer_move((30.0, 30.0)).unwrap();
    assert_object_count(&editor, 0);
    assert!(!surface(&editor).is_dirty());

    editor.pointer_up((40.0, 30.0)).unwrap();
    assert_object_count(&editor, 1);
    assert!(surface(&editor).is_dirty());
}

#[test]
fn test_render_is_idempotent() {
    let mut editor = editor_with_image((400, 300));

    assert!(editor.render().unwrap());
    assert!(!editor.render().unwrap());
    let first = surface(&editor).visible().unwrap().clone();

    editor.set_tool(Tool::Rectangle);
    editor.pointer_down((5.0, 5.0)).unwrap();
    editor.pointer_up((5.0, 5.0)).unwrap();
    assert!(editor.render().unwrap());
    assert_ne!(surface(&editor).visible().unwrap(), &first);
    assert_eq!(surface(&editor).render_count(), 2);
}

#[test]
fn test_drawn_shapes_reach_the_raster() {
    let mut editor = editor_with_image((100, 100));
    editor.set_tool(Tool::Rectangle);
    editor.set_color(Color::rgb(0, 0, 255));
    editor.pointer_down((0.0, 0.0)).unwrap();
    editor.pointer_up((50.0, 100.0)).unwrap();

    let artifact = editor.export(ExportFormat::Png).unwrap();
    let image = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(20, 50).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(80, 50).0, [255, 255, 255, 255]);
}

#[test]
fn test_export_follows_resize() {
    let mut editor = editor_with_image((120, 90));
    let h = handle(&editor);
    editor.surfaces.resize(h, 300, 200).unwrap();

    for format in [ExportFormat::Png, ExportFormat::Jpeg] {
        let artifact = editor.export(format).unwrap();
        let image = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((image.width(), image.height()), (300, 200), "{format:?}");
    }
}

#[test]
fn test_drag_moves_stroke_points() {
    let mut editor = editor_with_image((400, 300));
    editor.set_tool(Tool::Draw);
    editor.pointer_down((10.0, 10.0)).unwrap();
    editor.pointer_move((60.0, 10.0)).unwrap();
    editor.pointer_up((60.0, 60.0)).unwrap();

    editor.set_tool(Tool::Select);
    editor.pointer_down((30.0, 30.0)).unwrap();
    editor.pointer_up((35.0, 40.0)).unwrap();

    let DrawableKind::FreehandStroke { points, .. } = &drawables(&editor)[0].kind else {
        panic!("expected a stroke");
    };
    assert_eq!(points, &vec![(15.0, 20.0), (65.0, 20.0), (65.0, 70.0)]);
}
