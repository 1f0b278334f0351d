//! Extra canvas around seamed pages.

use crate::error::{Result, ScoreAugError};
use crate::geometry::resize_to;
use image::imageops;
use image::{Rgb, RgbImage};

/// Default number of pixels added to each axis
pub const DEFAULT_PADDING_LENGTH: u32 = 200;

/// Largest padding accepted by the configuration
pub const MAX_PADDING_LENGTH: u32 = 16_384;

const CANVAS_FILL: Rgb<u8> = Rgb([u8::MAX, u8::MAX, u8::MAX]);

/// Both canvases after padding, plus the offset applied to the content
#[derive(Debug)]
pub struct PaddedCanvas {
    pub foreground: RgbImage,
    pub background: RgbImage,
    pub offset: u32,
}

/// Size after adding `padding_length` to both axes, `None` on overflow
pub fn padded_size((width, height): (u32, u32), padding_length: u32) -> Option<(u32, u32)> {
    Some((
        width.checked_add(padding_length)?,
        height.checked_add(padding_length)?,
    ))
}

/// Offset of the original content inside the padded canvas
///
/// Odd lengths put the extra pixel on the right and bottom.
pub fn padding_offset(padding_length: u32) -> u32 {
    padding_length / 2
}

/// Grow the background to the padded size and centre the foreground on white
pub fn pad_canvas(
    foreground: &RgbImage,
    background: &RgbImage,
    padding_length: u32,
) -> Result<PaddedCanvas> {
    let (width, height) = padded_size(foreground.dimensions(), padding_length).ok_or_else(|| {
        ScoreAugError::InvalidConfig(format!(
            "padding_length {} overflows a {}x{} canvas",
            padding_length,
            foreground.width(),
            foreground.height()
        ))
    })?;
    let offset = padding_offset(padding_length);

    let mut canvas = RgbImage::from_pixel(width, height, CANVAS_FILL);
    imageops::replace(&mut canvas, foreground, offset as i64, offset as i64);

    Ok(PaddedCanvas {
        foreground: canvas,
        background: resize_to(background, (width, height)),
        offset,
    })
}
