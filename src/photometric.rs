//! Brightness, contrast and blur perturbations.

use crate::decisions::Decisions;
use image::{imageops, ImageBuffer, Rgb, RgbImage};

/// Contrast boost applied to every foreground
pub const FG_CONTRAST_FACTOR: f64 = 5.0;

/// Scale every channel by `factor`
pub fn adjust_brightness(img: &RgbImage, factor: f64) -> RgbImage {
    map_channels(img, |v| blend(0.0, v as f32, factor as f32))
}

/// Scale the distance of each channel from the mean luma by `factor`
pub fn adjust_contrast(img: &RgbImage, factor: f64) -> RgbImage {
    let mean = mean_luma(img) as f32;
    map_channels(img, |v| blend(mean, v as f32, factor as f32))
}

/// `from + alpha * (to - from)`, clamped then truncated to a level
fn blend(from: f32, to: f32, alpha: f32) -> u8 {
    (from + alpha * (to - from)).clamp(0.0, 255.0) as u8
}

/// Add `offset` to every channel, saturating at 255
pub fn add_brightness(img: &RgbImage, offset: f64) -> RgbImage {
    map_channels(img, |v| (v as f64 + offset).min(255.0) as u8)
}

/// Gaussian blur with sigma equal to `radius`
pub fn gaussian_blur(img: &RgbImage, radius: u32) -> RgbImage {
    imageops::blur(img, radius as f32)
}

/// ITU-R 601 luma of one pixel, rounded to the nearest level
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let weighted =
        pixel[0] as u32 * 19_595 + pixel[1] as u32 * 38_470 + pixel[2] as u32 * 7_471 + 0x8000;
    (weighted >> 16) as u8
}

/// Mean luma over the whole image, rounded half up to an integer level
pub fn mean_luma(img: &RgbImage) -> f64 {
    let pixel_count = img.width() as u64 * img.height() as u64;
    if pixel_count == 0 {
        return 0.0;
    }

    let total: u64 = img.pixels().map(|p| luma(p) as u64).sum();

    (total as f64 / pixel_count as f64 + 0.5).floor()
}

/// Background perturbation: random brightness
pub fn adjust_background(background: &RgbImage, decisions: &Decisions, honor_gates: bool) -> RgbImage {
    if honor_gates && !decisions.bg_brightness_gate {
        return background.clone();
    }
    adjust_brightness(background, decisions.bg_brightness)
}

/// Foreground perturbation: contrast, then brightness offset, then blur
pub fn adjust_foreground(foreground: &RgbImage, decisions: &Decisions, honor_gates: bool) -> RgbImage {
    let gate = |drawn: bool| !honor_gates || drawn;

    let mut result = foreground.clone();
    if gate(decisions.fg_contrast_gate) {
        result = adjust_contrast(&result, FG_CONTRAST_FACTOR);
    }
    if gate(decisions.fg_brightness_gate) {
        result = add_brightness(&result, decisions.fg_brightness_offset);
    }
    if gate(decisions.fg_blur_gate) {
        result = gaussian_blur(&result, decisions.blur_radius);
    }
    result
}

fn map_channels(img: &RgbImage, f: impl Fn(u8) -> u8) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut new_img = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        new_img.put_pixel(x, y, Rgb([f(pixel[0]), f(pixel[1]), f(pixel[2])]));
    }

    new_img
}
