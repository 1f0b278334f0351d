//! Utility modules for score-aug
//!
//! - `files`: directory listing and extension filtering
//! - `images`: decoding, saving and validating raster images

pub mod files;
pub mod images;
