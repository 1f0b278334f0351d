//! Per-call sample record and its JSON annotation sidecar.

use crate::error::{Result, ScoreAugError};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// (left, top, right, bottom) in pixels
pub type BoundingBox = [f32; 4];

/// Number of channels every sample carries
pub const CHANNELS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInfo {
    #[serde(default)]
    pub bboxes: Vec<BoundingBox>,
}

/// One training sample as handed over by the loader
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub img: RgbImage,
    /// (height, width, channels)
    pub img_shape: (u32, u32, u32),
    pub img_info: ImageInfo,
    pub ann_info: AnnotationInfo,
    pub gt_bboxes: Vec<BoundingBox>,
}

impl SampleRecord {
    /// Build a consistent record around `img`; `gt_bboxes` mirrors `bboxes`
    pub fn from_image(img: RgbImage, bboxes: Vec<BoundingBox>, filename: Option<String>) -> Self {
        let (width, height) = img.dimensions();
        SampleRecord {
            img,
            img_shape: (height, width, CHANNELS),
            img_info: ImageInfo {
                width,
                height,
                filename,
            },
            gt_bboxes: bboxes.clone(),
            ann_info: AnnotationInfo { bboxes },
        }
    }

    /// Pixel size as (width, height)
    pub fn size(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Reject records whose metadata disagrees with the pixel data
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.img.dimensions();
        if width == 0 || height == 0 {
            return Err(ScoreAugError::MalformedSample("image is empty".into()));
        }
        if self.img_shape != (height, width, CHANNELS) {
            return Err(ScoreAugError::MalformedSample(format!(
                "img_shape {:?} does not match image of {}x{}x{}",
                self.img_shape, height, width, CHANNELS
            )));
        }
        if (self.img_info.width, self.img_info.height) != (width, height) {
            return Err(ScoreAugError::MalformedSample(format!(
                "img_info reports {}x{} but image is {}x{}",
                self.img_info.width, self.img_info.height, width, height
            )));
        }
        if self.ann_info.bboxes.len() != self.gt_bboxes.len() {
            return Err(ScoreAugError::MalformedSample(format!(
                "ann_info has {} boxes but gt_bboxes has {}",
                self.ann_info.bboxes.len(),
                self.gt_bboxes.len()
            )));
        }
        Ok(())
    }

    /// Replace the image and keep shape metadata in step with it
    pub(crate) fn set_image(&mut self, img: RgbImage) {
        let (width, height) = img.dimensions();
        self.img = img;
        self.img_shape = (height, width, CHANNELS);
        self.img_info.width = width;
        self.img_info.height = height;
    }

    /// Translate both box collections by `offset` on both axes
    pub(crate) fn shift_boxes(&mut self, offset: f32) {
        for bbox in self
            .ann_info
            .bboxes
            .iter_mut()
            .chain(self.gt_bboxes.iter_mut())
        {
            for coord in bbox.iter_mut() {
                *coord += offset;
            }
        }
    }
}

/// JSON sidecar stored next to a sample image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bboxes: Vec<BoundingBox>,
}

impl Annotations {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl From<&SampleRecord> for Annotations {
    fn from(sample: &SampleRecord) -> Self {
        Annotations {
            bboxes: sample.gt_bboxes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn record() -> SampleRecord {
        SampleRecord::from_image(
            RgbImage::from_pixel(100, 80, Rgb([0, 0, 0])),
            vec![[10.0, 10.0, 50.0, 50.0], [0.0, 1.0, 2.0, 3.0]],
            Some("score.png".into()),
        )
    }

    #[test]
    fn from_image_fills_metadata() {
        let sample = record();
        assert_eq!(sample.img_shape, (80, 100, 3));
        assert_eq!((sample.img_info.width, sample.img_info.height), (100, 80));
        assert_eq!(sample.gt_bboxes, sample.ann_info.bboxes);
        sample.validate().unwrap();
    }

    #[test]
    fn stale_shape_is_rejected() {
        let mut sample = record();
        sample.img_shape = (100, 80, 3);
        assert!(matches!(
            sample.validate(),
            Err(ScoreAugError::MalformedSample(_))
        ));

        let mut sample = record();
        sample.img_info.width = 99;
        assert!(sample.validate().is_err());
    }

    #[test]
    fn box_collections_must_agree_in_length() {
        let mut sample = record();
        sample.ann_info.bboxes.pop();
        assert_eq!(sample.ann_info.bboxes.len(), 1);
        assert_eq!(sample.gt_bboxes.len(), 2);
        assert!(matches!(
            sample.validate(),
            Err(ScoreAugError::MalformedSample(_))
        ));
    }

    #[test]
    fn shift_moves_both_collections() {
        let mut sample = record();
        sample.shift_boxes(5.0);
        assert_eq!(sample.ann_info.bboxes[0], [15.0, 15.0, 55.0, 55.0]);
        assert_eq!(sample.gt_bboxes[1], [5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn sidecar_without_boxes_parses_empty() {
        let parsed: Annotations = serde_json::from_str("{}").unwrap();
        assert!(parsed.bboxes.is_empty());

        let parsed: Annotations = serde_json::from_str(r#"{"bboxes": [[1, 2, 3, 4]]}"#).unwrap();
        assert_eq!(parsed.bboxes, vec![[1.0, 2.0, 3.0, 4.0]]);
    }
}
