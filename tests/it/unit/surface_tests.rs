//! Unit tests for the surface registry and its rasterization.

use docmark::color::Color;
use docmark::surface::{BackgroundPolicy, RasterFormat, SurfaceError, SurfaceRegistry};
use docmark::types::{Drawable, RasterFrame};

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

#[test]
fn test_handles_are_never_reused() {
    let mut registry = SurfaceRegistry::new();
    let first = registry.create_surface(10, 10).unwrap();
    registry.dispose(first).unwrap();
    let second = registry.create_surface(10, 10).unwrap();

    assert_ne!(first, second);
    assert!(!registry.is_live(first));
    assert!(registry.is_live(second));
    assert_eq!(registry.live_count(), 1);
}

#[test]
fn test_every_operation_rejects_disposed_handle() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(10, 10).unwrap();
    registry.dispose(handle).unwrap();

    let invalid = Err(SurfaceError::InvalidHandle(handle));
    assert_eq!(registry.resize(handle, 5, 5), invalid);
    assert_eq!(registry.render(handle).map(|_| ()), invalid);
    assert_eq!(
        registry
            .add_object(handle, Drawable::circle((0.0, 0.0), 1.0, Color::BLACK))
            .map(|_| ()),
        invalid
    );
    assert_eq!(registry.get_selected(handle).map(|_| ()), invalid);
    assert_eq!(registry.dispose(handle), invalid);
    assert!(registry.to_raster(handle, RasterFormat::Png, 90).is_err());
}

#[test]
fn test_to_raster_matches_resized_dimensions() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(40, 30).unwrap();
    registry.resize(handle, 64, 48).unwrap();

    let png = registry.to_raster(handle, RasterFormat::Png, 90).unwrap();
    let image = decode(&png);
    assert_eq!(image.dimensions(), (64, 48));

    let jpeg = registry.to_raster(handle, RasterFormat::Jpeg, 90).unwrap();
    assert_eq!(decode(&jpeg).dimensions(), (64, 48));
}

#[test]
fn test_to_raster_paints_background_then_objects() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(20, 20).unwrap();
    registry
        .set_background(
            handle,
            RasterFrame::solid(20, 20, Color::rgb(0, 0, 255)),
            BackgroundPolicy::ClearForeground,
        )
        .unwrap();
    registry
        .add_object(
            handle,
            Drawable::rectangle((0.0, 0.0), (10.0, 20.0), Color::rgb(255, 0, 0)),
        )
        .unwrap();

    let image = decode(&registry.to_raster(handle, RasterFormat::Png, 90).unwrap());
    assert_eq!(image.get_pixel(4, 10).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(15, 10).0, [0, 0, 255, 255]);
}

#[test]
fn test_to_raster_does_not_need_render() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(8, 8).unwrap();
    registry
        .add_object(
            handle,
            Drawable::rectangle((0.0, 0.0), (8.0, 8.0), Color::rgb(0, 128, 0)),
        )
        .unwrap();

    let image = decode(&registry.to_raster(handle, RasterFormat::Png, 90).unwrap());
    assert_eq!(image.get_pixel(4, 4).0, [0, 128, 0, 255]);
    assert_eq!(registry.get(handle).unwrap().render_count(), 0);
}

#[test]
fn test_render_only_after_mutation() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(8, 8).unwrap();

    assert!(registry.render(handle).unwrap());
    assert!(!registry.render(handle).unwrap());
    assert!(!registry.get(handle).unwrap().is_dirty());

    let id = registry
        .add_object(handle, Drawable::circle((1.0, 1.0), 2.0, Color::BLACK))
        .unwrap();
    assert!(registry.get(handle).unwrap().is_dirty());
    assert!(registry.render(handle).unwrap());

    registry.move_object(handle, id, 1.5, 0.5).unwrap();
    assert!(registry.render(handle).unwrap());
    assert_eq!(registry.get(handle).unwrap().render_count(), 3);
}

#[test]
fn test_keep_foreground_policy_preserves_objects() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(8, 8).unwrap();
    registry
        .add_object(handle, Drawable::circle((1.0, 1.0), 2.0, Color::BLACK))
        .unwrap();

    let removed = registry
        .set_background(
            handle,
            RasterFrame::solid(8, 8, Color::WHITE),
            BackgroundPolicy::KeepForeground,
        )
        .unwrap();

    assert!(removed.is_empty());
    let surface = registry.get(handle).unwrap();
    assert_eq!(surface.object_count(), 1);
    assert_eq!(surface.background_updates(), 1);
}

#[test]
fn test_background_is_not_hit_testable() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(8, 8).unwrap();
    registry
        .set_background(
            handle,
            RasterFrame::solid(8, 8, Color::WHITE),
            BackgroundPolicy::ClearForeground,
        )
        .unwrap();

    assert_eq!(registry.object_at(handle, 4.0, 4.0).unwrap(), None);
}

#[test]
fn test_resize_object_rejects_non_positive_size() {
    let mut registry = SurfaceRegistry::new();
    let handle = registry.create_surface(8, 8).unwrap();
    let id = registry
        .add_object(
            handle,
            Drawable::rectangle((0.0, 0.0), (4.0, 4.0), Color::BLACK),
        )
        .unwrap();

    assert!(registry.resize_object(handle, id, 0.0, 3.0).is_err());
    registry.resize_object(handle, id, 6.5, 2.5).unwrap();
    assert_eq!(registry.get(handle).unwrap().object(id).unwrap().size(), (6.5, 2.5));
}
