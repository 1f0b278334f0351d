//! The score-on-blank-page augmentation.

use crate::compose::darken;
use crate::config::ScoreAugConfig;
use crate::decisions::Decisions;
use crate::error::{Result, ScoreAugError};
use crate::geometry::fit_background;
use crate::padding::pad_canvas;
use crate::photometric::{adjust_background, adjust_foreground};
use crate::pool::{ImagePool, PageCategory};
use crate::sample::SampleRecord;
use image::RgbImage;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Blends a score sample onto a random real-world blank page
///
/// Built once, then shared by reference between workers. Each call takes the
/// caller's RNG, so workers keep independent streams.
#[derive(Debug, Clone)]
pub struct ScoreAug {
    config: ScoreAugConfig,
    pool: Arc<ImagePool>,
}

impl ScoreAug {
    /// Validate `config` and load its blank pages
    pub fn new(config: ScoreAugConfig) -> Result<Self> {
        config.validate()?;
        let pool = ImagePool::from_root(&config.blank_pages_path, config.extensions.as_slice())?;
        Self::from_pool(config, Arc::new(pool))
    }

    /// Use an already loaded pool
    pub fn from_pool(config: ScoreAugConfig, pool: Arc<ImagePool>) -> Result<Self> {
        config.validate()?;
        if let Some(category) = empty_category(&pool) {
            return Err(ScoreAugError::EmptyPool {
                category,
                path: config.blank_pages_path.join(category.dir_name()),
            });
        }
        Ok(ScoreAug { config, pool })
    }

    pub fn config(&self) -> &ScoreAugConfig {
        &self.config
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    /// Augment `sample` and return it
    pub fn apply(&self, sample: SampleRecord, rng: &mut impl Rng) -> Result<SampleRecord> {
        self.apply_traced(sample, rng).map(|(sample, _)| sample)
    }

    /// Augment `sample`, also returning the draws that shaped the result
    pub fn apply_traced(
        &self,
        mut sample: SampleRecord,
        rng: &mut impl Rng,
    ) -> Result<(SampleRecord, Decisions)> {
        sample.validate()?;

        let target = sample.size();
        let decisions = Decisions::draw(rng, &self.pool, target).ok_or_else(|| self.empty_pool())?;
        let page = self
            .pool
            .page(decisions.category, decisions.page_index)
            .ok_or_else(|| self.empty_pool())?;

        let mut background = fit_background(page, target, &decisions);
        let mut foreground = std::mem::replace(&mut sample.img, RgbImage::new(0, 0));

        if decisions.needs_padding() {
            let padded = pad_canvas(&foreground, &background, self.config.padding_length)?;
            foreground = padded.foreground;
            background = padded.background;
            sample.shift_boxes(padded.offset as f32);
        }

        let background = adjust_background(&background, &decisions, self.config.honor_gates);
        let foreground = adjust_foreground(&foreground, &decisions, self.config.honor_gates);

        sample.set_image(darken(&foreground, &background)?);

        tracing::debug!(
            category = %decisions.category,
            page = decisions.page_index,
            padded = decisions.needs_padding(),
            cropped = decisions.crop.is_some(),
            width = sample.img_info.width,
            height = sample.img_info.height,
            "augmented sample"
        );

        Ok((sample, decisions))
    }

    fn empty_pool(&self) -> ScoreAugError {
        let category = empty_category(&self.pool).unwrap_or(PageCategory::Seamless);
        ScoreAugError::EmptyPool {
            category,
            path: self.config.blank_pages_path.join(category.dir_name()),
        }
    }
}

fn empty_category(pool: &ImagePool) -> Option<PageCategory> {
    PageCategory::ALL
        .into_iter()
        .find(|&category| pool.len(category) == 0)
}

impl fmt::Display for ScoreAug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoreAug(blank_pages_path={})",
            self.config.blank_pages_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::rng_for_sample;
    use image::{Rgb, RgbImage};

    fn pool_with(seamless: Option<RgbImage>, seamed: Option<RgbImage>) -> Arc<ImagePool> {
        let tmp = tempfile::tempdir().unwrap();
        let mut pool = ImagePool::default();
        for (category, page) in [(PageCategory::Seamless, seamless), (PageCategory::Seamed, seamed)] {
            if let Some(page) = page {
                let dir = tmp.path().join(category.dir_name());
                std::fs::create_dir_all(&dir).unwrap();
                page.save(dir.join("page.png")).unwrap();
                pool.load(&dir, category, &["png"]).unwrap();
            }
        }
        Arc::new(pool)
    }

    fn score() -> SampleRecord {
        SampleRecord::from_image(
            RgbImage::from_fn(100, 80, |x, _| {
                if x % 10 == 0 {
                    Rgb([0, 0, 0])
                } else {
                    Rgb([255, 255, 255])
                }
            }),
            vec![[10.0, 10.0, 50.0, 50.0]],
            None,
        )
    }

    fn page() -> Option<RgbImage> {
        Some(RgbImage::from_pixel(60, 90, Rgb([230, 220, 200])))
    }

    #[test]
    fn empty_category_is_rejected_up_front() {
        let config = ScoreAugConfig::new("pages");
        let err = ScoreAug::from_pool(config, pool_with(page(), None)).unwrap_err();
        assert!(matches!(
            err,
            ScoreAugError::EmptyPool {
                category: PageCategory::Seamed,
                ..
            }
        ));
    }

    #[test]
    fn malformed_sample_fails_before_drawing() {
        let aug = ScoreAug::from_pool(ScoreAugConfig::new("pages"), pool_with(page(), page())).unwrap();
        let mut sample = score();
        sample.img_shape = (1, 1, 3);
        assert!(matches!(
            aug.apply(sample, &mut rng_for_sample(0, 0)),
            Err(ScoreAugError::MalformedSample(_))
        ));
    }

    #[test]
    fn padding_follows_the_drawn_branch() {
        let config = ScoreAugConfig::new("pages").with_padding_length(10);
        let aug = ScoreAug::from_pool(config, pool_with(page(), page())).unwrap();

        for index in 0..64 {
            let (out, decisions) = aug
                .apply_traced(score(), &mut rng_for_sample(3, index))
                .unwrap();
            if decisions.needs_padding() {
                assert_eq!(out.size(), (110, 90));
                assert_eq!(out.img_shape, (90, 110, 3));
                assert_eq!(out.ann_info.bboxes, vec![[15.0, 15.0, 55.0, 55.0]]);
                assert_eq!(out.gt_bboxes, vec![[15.0, 15.0, 55.0, 55.0]]);
            } else {
                assert_eq!(out.size(), (100, 80));
                assert_eq!(out.gt_bboxes, vec![[10.0, 10.0, 50.0, 50.0]]);
            }
            out.validate().unwrap();
        }
    }

    #[test]
    fn honored_gates_can_skip_every_effect() {
        let config = ScoreAugConfig::new("pages")
            .with_padding_length(10)
            .with_honor_gates(true);
        let aug = ScoreAug::from_pool(config, pool_with(page(), page())).unwrap();
        assert!(aug.config().honor_gates);

        let mut untouched = 0;
        for index in 0..128 {
            let input = score();
            let (out, decisions) = aug
                .apply_traced(input.clone(), &mut rng_for_sample(41, index))
                .unwrap();
            if decisions.bg_brightness_gate
                || decisions.fg_contrast_gate
                || decisions.fg_brightness_gate
                || decisions.fg_blur_gate
            {
                continue;
            }

            let page = aug.pool().page(decisions.category, decisions.page_index).unwrap();
            let mut background = fit_background(page, input.size(), &decisions);
            let mut foreground = input.img;
            if decisions.needs_padding() {
                let padded = pad_canvas(&foreground, &background, 10).unwrap();
                foreground = padded.foreground;
                background = padded.background;
            }
            assert_eq!(out.img, darken(&foreground, &background).unwrap());
            untouched += 1;
        }
        assert!(untouched > 0);
    }

    #[test]
    fn display_names_the_page_directory() {
        let aug = ScoreAug::from_pool(ScoreAugConfig::new("/data/pages"), pool_with(page(), page())).unwrap();
        assert_eq!(aug.to_string(), "ScoreAug(blank_pages_path=/data/pages)");
    }
}
