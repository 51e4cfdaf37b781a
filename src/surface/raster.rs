//! Compositing drawables into pixels with tiny-skia.
//!
//! Drawables paint back to front onto an opaque base fill. The pixmap is
//! premultiplied internally; frames going in and images coming out are
//! straight-alpha `RgbaImage`s.

use super::text;
use super::{RasterFormat, SurfaceError, SurfaceResult};
use crate::color::Color;
use crate::types::{Drawable, DrawableKind, LineCap, RasterFrame};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};
use tracing::warn;

/// Paint `drawables` in order over a `base` fill.
pub fn composite<'a>(
    width: u32,
    height: u32,
    base: Color,
    drawables: impl Iterator<Item = &'a Drawable>,
) -> SurfaceResult<RgbaImage> {
    super::validate_dimensions(width, height)?;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
    let [r, g, b, a] = base.to_rgba_u8();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    for drawable in drawables {
        draw(&mut pixmap, drawable);
    }
    Ok(pixmap_to_image(&pixmap))
}

fn solid_paint(color: Color, opacity: f32) -> Paint<'static> {
    let [r, g, b, a] = color.with_opacity(opacity).to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Paint a single drawable onto the pixmap.
pub fn draw(pixmap: &mut Pixmap, drawable: &Drawable) {
    let (x, y) = drawable.position;
    let opacity = drawable.opacity;

    match &drawable.kind {
        DrawableKind::Rectangle { size, fill } => {
            if let Some(rect) = Rect::from_xywh(x, y, size.0, size.1) {
                pixmap.fill_rect(rect, &solid_paint(*fill, opacity), Transform::identity(), None);
            }
        }
        DrawableKind::Circle { radius, fill } => {
            if let Some(path) = PathBuilder::from_circle(x + radius, y + radius, *radius) {
                pixmap.fill_path(
                    &path,
                    &solid_paint(*fill, opacity),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        DrawableKind::TextBox {
            font_size,
            color,
            background,
            ..
        } => {
            if let Some(bg) = background {
                let (w, h) = drawable.size();
                if let Some(rect) = Rect::from_xywh(x, y, w, h) {
                    pixmap.fill_rect(rect, &solid_paint(*bg, opacity), Transform::identity(), None);
                }
            }
            if let Some(lines) = drawable.text_lines() {
                text::draw_text(pixmap, &lines, (x, y), *font_size, color.with_opacity(opacity));
            }
        }
        DrawableKind::FreehandStroke {
            points,
            color,
            width,
            cap,
        } => {
            let Some(path) = smoothed_path(points) else {
                return;
            };
            let stroke = Stroke {
                width: *width,
                line_cap: match cap {
                    LineCap::Butt => tiny_skia::LineCap::Butt,
                    LineCap::Round => tiny_skia::LineCap::Round,
                    LineCap::Square => tiny_skia::LineCap::Square,
                },
                line_join: LineJoin::Round,
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &solid_paint(*color, opacity),
                &stroke,
                Transform::identity(),
                None,
            );
        }
        DrawableKind::Image { size, frame } => draw_frame(pixmap, frame, (x, y), *size, opacity),
    }
}

/// Quadratic curve through the midpoints of consecutive samples.
fn smoothed_path(points: &[(f32, f32)]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let last = rest.last()?;

    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for pair in points.windows(2).skip(1) {
        let (ctrl, next) = (pair[0], pair[1]);
        let mid = ((ctrl.0 + next.0) / 2.0, (ctrl.1 + next.1) / 2.0);
        pb.quad_to(ctrl.0, ctrl.1, mid.0, mid.1);
    }
    pb.line_to(last.0, last.1);
    pb.finish()
}

fn draw_frame(pixmap: &mut Pixmap, frame: &RasterFrame, at: (f32, f32), size: (f32, f32), opacity: f32) {
    // Blank pages carry a single pixel; a plain fill covers them.
    if frame.dimensions() == (1, 1) {
        let [r, g, b, a] = frame.image().get_pixel(0, 0).0;
        if let Some(rect) = Rect::from_xywh(at.0, at.1, size.0, size.1) {
            let fill = solid_paint(Color::rgba(r, g, b, a), opacity);
            pixmap.fill_rect(rect, &fill, Transform::identity(), None);
        }
        return;
    }
    let Some(source) = image_to_pixmap(frame.image()) else {
        warn!(
            width = frame.width(),
            height = frame.height(),
            "skipping empty image drawable"
        );
        return;
    };
    let sx = size.0 / frame.width() as f32;
    let sy = size.1 / frame.height() as f32;
    let paint = PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0),
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_row(sx, 0.0, 0.0, sy, at.0, at.1),
        None,
    );
}

/// Straight-alpha image to premultiplied pixmap.
pub fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Premultiplied pixmap to straight-alpha image.
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}

/// Encode a composited frame. JPEG drops alpha, which is safe over the opaque base.
pub fn encode(image: &RgbaImage, format: RasterFormat, jpeg_quality: u8) -> SurfaceResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        RasterFormat::Png => image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| SurfaceError::Encode(e.to_string()))?,
        RasterFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, jpeg_quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)
                .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        }
    }
    Ok(bytes)
}
