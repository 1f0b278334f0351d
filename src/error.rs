use std::path::PathBuf;

use crate::pool::PageCategory;

pub type Result<T> = std::result::Result<T, ScoreAugError>;

#[derive(Debug, thiserror::Error)]
pub enum ScoreAugError {
    /// Blank page root or one of its category directories is unusable.
    #[error("blank pages at {}: {reason}", path.display())]
    Construction { path: PathBuf, reason: String },

    #[error("no {category} blank pages found in {}", path.display())]
    EmptyPool {
        category: PageCategory,
        path: PathBuf,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed sample: {0}")]
    MalformedSample(String),

    #[error("foreground is {foreground:?} but background is {background:?}")]
    ShapeMismatch {
        foreground: (u32, u32),
        background: (u32, u32),
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl ScoreAugError {
    pub(crate) fn construction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Construction {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
