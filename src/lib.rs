//! Augment sheet-music samples with real-world blank pages.
//!
//! [`ScoreAug`] picks a seamless or seamed page from an [`ImagePool`], fits it
//! to the score, optionally pads seamed pages (shifting the boxes), perturbs
//! both images and keeps the darker pixel of the two.

pub mod augmentation;
pub mod compose;
pub mod config;
pub mod decisions;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod padding;
pub mod photometric;
pub mod pool;
pub mod sample;
pub mod transform;
pub mod utils;

pub use config::ScoreAugConfig;
pub use decisions::{rng_for_sample, Decisions};
pub use error::{Result, ScoreAugError};
pub use pool::{ImagePool, PageCategory};
pub use sample::{BoundingBox, SampleRecord};
pub use transform::ScoreAug;
