//! Text rendering for text-box drawables.
//!
//! Glyph outlines come from the system sans-serif face (located once through
//! fontdb) and are filled as tiny-skia paths. Without a usable system font,
//! text boxes still contribute their background fill but no glyphs.

use crate::color::Color;
use crate::constants::LINE_HEIGHT_FACTOR;
use once_cell::sync::Lazy;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

/// Raw bytes of a font face plus its index within a collection.
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
}

impl FontFace {
    pub fn parse(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

static SYSTEM_FONT: Lazy<Option<FontFace>> = Lazy::new(load_system_font);

fn load_system_font() -> Option<FontFace> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let id = db.query(&fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    });
    let face = id.and_then(|id| {
        db.with_face_data(id, |data, index| FontFace {
            data: data.to_vec(),
            index,
        })
    });

    match &face {
        Some(_) => debug!(faces = db.len(), "system font loaded"),
        None => warn!("no sans-serif system font found, text boxes render without glyphs"),
    }
    face
}

/// The shared system font, if one was found.
pub fn system_font() -> Option<&'static FontFace> {
    SYSTEM_FONT.as_ref()
}

/// Horizontal advance of `text` in pixels at `font_size`.
///
/// Falls back to half an em per character when no font is available.
pub fn measure(text: &str, font_size: f32) -> f32 {
    match system_font().and_then(FontFace::parse) {
        Some(face) => {
            let scale = font_size / face.units_per_em() as f32;
            text.chars().map(|c| advance(&face, c) * scale).sum()
        }
        None => text.chars().count() as f32 * font_size * 0.5,
    }
}

fn advance(face: &ttf_parser::Face<'_>, c: char) -> f32 {
    face.glyph_index(c)
        .and_then(|g| face.glyph_hor_advance(g))
        .map(f32::from)
        .unwrap_or(face.units_per_em() as f32 * 0.5)
}

/// Break `text` into lines no wider than `width`.
///
/// Explicit newlines always break. A single word wider than `width` gets a
/// line of its own.
pub fn wrap_lines(text: &str, font_size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && measure(&candidate, font_size) > width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Feeds ttf-parser outlines into a tiny-skia path, flipping the y axis.
struct GlyphPath<'a> {
    builder: &'a mut PathBuilder,
    origin: (f32, f32),
    scale: f32,
}

impl GlyphPath<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin.0 + x * self.scale, self.origin.1 - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphPath<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Fill the glyphs of already wrapped `lines`, top-left at `position`.
pub fn draw_text(
    pixmap: &mut Pixmap,
    lines: &[String],
    position: (f32, f32),
    font_size: f32,
    color: Color,
) {
    let Some(face) = system_font().and_then(FontFace::parse) else {
        return;
    };
    let scale = font_size / face.units_per_em() as f32;
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    let ascent = face.ascender() as f32 * scale;

    let mut builder = PathBuilder::new();
    for (row, line) in lines.iter().enumerate() {
        let mut pen_x = position.0;
        let baseline = position.1 + row as f32 * line_height + ascent;
        for c in line.chars() {
            if let Some(glyph) = face.glyph_index(c) {
                let mut sink = GlyphPath {
                    builder: &mut builder,
                    origin: (pen_x, baseline),
                    scale,
                };
                face.outline_glyph(glyph, &mut sink);
            }
            pen_x += advance(&face, c) * scale;
        }
    }

    let Some(path) = builder.finish() else {
        return;
    };
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}
