//! Fit a blank page onto the foreground's pixel grid.

use crate::decisions::{CropWindow, Decisions};
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Resampling filter used for every resize
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Resize `img` to exactly (width, height)
pub fn resize_to(img: &RgbImage, (width, height): (u32, u32)) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, RESIZE_FILTER)
}

/// Crop `window` out of `img` and resize it back to `target`
pub fn crop_resize(img: &RgbImage, window: &CropWindow, target: (u32, u32)) -> RgbImage {
    let cropped = imageops::crop_imm(img, window.x, window.y, window.width, window.height).to_image();
    resize_to(&cropped, target)
}

/// Resize, flip and optionally crop-resize `page` so it matches `target`
pub fn fit_background(page: &RgbImage, target: (u32, u32), decisions: &Decisions) -> RgbImage {
    let mut background = resize_to(page, target);

    if decisions.flip_horizontal {
        imageops::flip_horizontal_in_place(&mut background);
    }
    if decisions.flip_vertical {
        imageops::flip_vertical_in_place(&mut background);
    }

    if let Some(window) = &decisions.crop {
        background = crop_resize(&background, window, target);
    }

    background
}
