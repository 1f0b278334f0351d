//! Merge ink over paper.

use crate::error::{Result, ScoreAugError};
use image::{ImageBuffer, Rgb, RgbImage};

/// Per-channel minimum of `foreground` and `background`
///
/// Dark ink survives over lighter paper. Both images must already share a size.
pub fn darken(foreground: &RgbImage, background: &RgbImage) -> Result<RgbImage> {
    if foreground.dimensions() != background.dimensions() {
        return Err(ScoreAugError::ShapeMismatch {
            foreground: foreground.dimensions(),
            background: background.dimensions(),
        });
    }

    let (width, height) = foreground.dimensions();
    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let fg = foreground.get_pixel(x, y);
        let bg = background.get_pixel(x, y);
        Rgb([fg[0].min(bg[0]), fg[1].min(bg[1]), fg[2].min(bg[2])])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_channelwise_minimum() {
        let fg = RgbImage::from_pixel(2, 2, Rgb([10, 200, 128]));
        let bg = RgbImage::from_pixel(2, 2, Rgb([50, 100, 128]));
        let out = darken(&fg, &bg).unwrap();
        assert!(out.pixels().all(|p| p.0 == [10, 100, 128]));
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let fg = RgbImage::new(2, 2);
        let bg = RgbImage::new(3, 2);
        assert!(matches!(
            darken(&fg, &bg),
            Err(ScoreAugError::ShapeMismatch {
                foreground: (2, 2),
                background: (3, 2)
            })
        ));
    }
}
