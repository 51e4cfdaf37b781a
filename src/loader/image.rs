//! PNG/JPEG decoding.

use super::{LoadResult, LoadedPage};
use crate::types::RasterFrame;
use ::image::imageops::FilterType;
use tracing::debug;

/// Size that fits `size` inside `max`, preserving aspect ratio.
///
/// Images are only ever scaled down, never up.
pub fn fit_within(size: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (w, h) = size;
    if w == 0 || h == 0 {
        return size;
    }
    let scale = (max.0 as f32 / w as f32)
        .min(max.1 as f32 / h as f32)
        .min(1.0);
    if scale >= 1.0 {
        return size;
    }
    (
        ((w as f32 * scale).round() as u32).max(1),
        ((h as f32 * scale).round() as u32).max(1),
    )
}

/// Decode an image and scale it to fit the canvas footprint.
pub fn load_image(bytes: &[u8], max: (u32, u32)) -> LoadResult<LoadedPage> {
    let frame = decode_frame(bytes)?;
    let natural = frame.dimensions();
    let fitted = fit_within(natural, max);
    if fitted == natural {
        return Ok(LoadedPage::from_frame(frame));
    }

    debug!(?natural, ?fitted, "scaling image down to fit");
    let scaled = ::image::imageops::resize(frame.image(), fitted.0, fitted.1, FilterType::Triangle);
    Ok(LoadedPage::from_frame(RasterFrame::new(scaled)))
}

/// Decode image bytes at natural size.
pub fn decode_frame(bytes: &[u8]) -> LoadResult<RasterFrame> {
    let decoded = ::image::load_from_memory(bytes)?;
    Ok(RasterFrame::new(decoded.to_rgba8()))
}
