use crate::error::{Result, ScoreAugError};
use image::{GenericImageView, ImageFormat, RgbImage};
use std::fs;
use std::io;
use std::path::Path;

/// Decode an image file and convert it to 8-bit RGB
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| ScoreAugError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.into_rgb8())
}

/// Save an RGB image as PNG
pub fn save_png(img: &RgbImage, target_path: &Path) -> Result<()> {
    img.save_with_format(target_path, ImageFormat::Png)?;
    Ok(())
}

/// Validate that a written image file is not corrupted and has usable dimensions
pub fn validate_image(image_path: &Path) -> io::Result<()> {
    let metadata = fs::metadata(image_path)?;
    if metadata.len() == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Image file is empty",
        ));
    }

    // Attempt to decode the image to check for corruption
    match image::open(image_path) {
        Ok(img) => {
            let (width, height) = img.dimensions();
            if width == 0 || height == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Image has invalid dimensions (0x0)",
                ));
            }
            Ok(())
        }
        Err(e) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Image validation failed: {}", e),
        )),
    }
}
