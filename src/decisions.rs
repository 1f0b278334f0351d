//! Random draws that parameterize one augmentation call.
//!
//! Every draw is taken in a fixed order, including the gates that are ignored
//! unless gating is enabled, so a seed always maps to the same augmentation.

use crate::pool::{ImagePool, PageCategory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

pub const CROP_FACTOR_RANGE: Range<f64> = 0.25..0.85;
pub const BG_BRIGHTNESS_RANGE: Range<f64> = 0.8..1.1;
pub const FG_BRIGHTNESS_OFFSET_RANGE: Range<f64> = 30.0..150.0;
pub const BLUR_RADIUS_RANGE: Range<u32> = 1..4;

const SEAMLESS_P: f64 = 0.5;
const FLIP_P: f64 = 0.5;
const CROP_P: f64 = 0.5;
const BG_BRIGHTNESS_P: f64 = 0.5;
const FG_CONTRAST_P: f64 = 0.2;
const FG_BRIGHTNESS_P: f64 = 0.4;
const FG_BLUR_P: f64 = 0.4;

/// Sub-rectangle of the resized background to crop and resize back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub factor: f64,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    /// Place a crop of `factor * target` uniformly inside `target`
    fn draw(rng: &mut impl Rng, (width, height): (u32, u32)) -> Self {
        let factor = rng.random_range(CROP_FACTOR_RANGE);
        let crop_width = ((factor * width as f64) as u32).clamp(1, width.max(1));
        let crop_height = ((factor * height as f64) as u32).clamp(1, height.max(1));

        let max_x = width.saturating_sub(crop_width);
        let max_y = height.saturating_sub(crop_height);
        let x = (rng.random::<f64>() * max_x as f64) as u32;
        let y = (rng.random::<f64>() * max_y as f64) as u32;

        CropWindow {
            factor,
            x: x.min(max_x),
            y: y.min(max_y),
            width: crop_width,
            height: crop_height,
        }
    }
}

/// Everything drawn for one call, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Decisions {
    pub category: PageCategory,
    pub page_index: usize,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub crop: Option<CropWindow>,
    pub bg_brightness_gate: bool,
    pub bg_brightness: f64,
    pub fg_contrast_gate: bool,
    pub fg_brightness_gate: bool,
    pub fg_brightness_offset: f64,
    pub fg_blur_gate: bool,
    pub blur_radius: u32,
}

impl Decisions {
    /// Draw a full decision set for a foreground of size `target` (width, height)
    ///
    /// Returns `None` if the chosen category has no pages.
    pub fn draw(rng: &mut impl Rng, pool: &ImagePool, target: (u32, u32)) -> Option<Self> {
        let category = if rng.random_bool(SEAMLESS_P) {
            PageCategory::Seamless
        } else {
            PageCategory::Seamed
        };
        let page_index = pool.sample_index(category, rng)?;

        let flip_horizontal = rng.random_bool(FLIP_P);
        let flip_vertical = rng.random_bool(FLIP_P);

        let crop = if rng.random_bool(CROP_P) {
            Some(CropWindow::draw(rng, target))
        } else {
            None
        };

        let bg_brightness_gate = rng.random_bool(BG_BRIGHTNESS_P);
        let bg_brightness = rng.random_range(BG_BRIGHTNESS_RANGE);

        let fg_contrast_gate = rng.random_bool(FG_CONTRAST_P);

        let fg_brightness_gate = rng.random_bool(FG_BRIGHTNESS_P);
        let fg_brightness_offset = rng.random_range(FG_BRIGHTNESS_OFFSET_RANGE);

        let fg_blur_gate = rng.random_bool(FG_BLUR_P);
        let blur_radius = rng.random_range(BLUR_RADIUS_RANGE);

        Some(Decisions {
            category,
            page_index,
            flip_horizontal,
            flip_vertical,
            crop,
            bg_brightness_gate,
            bg_brightness,
            fg_contrast_gate,
            fg_brightness_gate,
            fg_brightness_offset,
            fg_blur_gate,
            blur_radius,
        })
    }

    /// Padding fires for seamed pages that were not crop-resized
    pub fn needs_padding(&self) -> bool {
        self.category == PageCategory::Seamed && self.crop.is_none()
    }
}

/// Independent, reproducible stream for sample `index` under `seed`
pub fn rng_for_sample(seed: u64, index: u64) -> StdRng {
    // splitmix64 step so neighbouring indices don't share seed bits
    let mut z = seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    StdRng::seed_from_u64(z ^ (z >> 31))
}
