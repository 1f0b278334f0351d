//! Blank page backgrounds, grouped by category.
//!
//! Pages are decoded once into a single arena and never mutated afterward, so
//! one pool can be shared by reference across any number of workers.

use crate::error::{Result, ScoreAugError};
use crate::utils::files::list_files_with_extensions;
use crate::utils::images::load_rgb;
use image::RgbImage;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of blank page used as a background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageCategory {
    /// Pages that tile without a visible join
    Seamless,
    /// Pages that show a physical edge or seam
    Seamed,
}

impl PageCategory {
    pub const ALL: [PageCategory; 2] = [PageCategory::Seamless, PageCategory::Seamed];

    /// Name of the subdirectory holding this category's pages
    pub fn dir_name(self) -> &'static str {
        match self {
            PageCategory::Seamless => "seamless",
            PageCategory::Seamed => "seamed",
        }
    }
}

impl fmt::Display for PageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Immutable store of decoded blank pages
#[derive(Debug, Default)]
pub struct ImagePool {
    pages: Vec<RgbImage>,
    seamless: Vec<usize>,
    seamed: Vec<usize>,
}

impl ImagePool {
    /// Load both categories from `root/seamless` and `root/seamed`
    pub fn from_root<S: AsRef<str> + Sync>(root: &Path, extensions: &[S]) -> Result<Self> {
        check_directory(root)?;

        let mut pool = ImagePool::default();
        for category in PageCategory::ALL {
            pool.load(&root.join(category.dir_name()), category, extensions)?;
        }

        tracing::info!(
            seamless = pool.len(PageCategory::Seamless),
            seamed = pool.len(PageCategory::Seamed),
            "loaded blank pages from {}",
            root.display()
        );
        Ok(pool)
    }

    /// Decode every accepted image under `dir` into `category`
    pub fn load<S: AsRef<str> + Sync>(
        &mut self,
        dir: &Path,
        category: PageCategory,
        extensions: &[S],
    ) -> Result<()> {
        check_directory(dir)?;

        let files = list_files_with_extensions(dir, extensions)?;
        if files.is_empty() {
            return Err(ScoreAugError::EmptyPool {
                category,
                path: dir.to_path_buf(),
            });
        }

        let decoded = files
            .par_iter()
            .map(|path| load_rgb(path))
            .collect::<Result<Vec<_>>>()?;

        for page in decoded {
            let index = self.pages.len();
            self.pages.push(page);
            self.indices_mut(category).push(index);
        }

        tracing::debug!(%category, count = files.len(), "decoded pages from {}", dir.display());
        Ok(())
    }

    /// Number of pages held for `category`
    pub fn len(&self, category: PageCategory) -> usize {
        self.indices(category).len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page at `index` within `category`
    pub fn page(&self, category: PageCategory, index: usize) -> Option<&RgbImage> {
        self.indices(category)
            .get(index)
            .map(|&arena_index| &self.pages[arena_index])
    }

    /// Uniformly draw a page index within `category`
    ///
    /// Returns `None` only for a category that was never loaded.
    pub fn sample_index(&self, category: PageCategory, rng: &mut impl Rng) -> Option<usize> {
        let len = self.len(category);
        if len == 0 {
            None
        } else {
            Some(rng.random_range(0..len))
        }
    }

    /// Uniformly draw a page from `category`
    pub fn sample(&self, category: PageCategory, rng: &mut impl Rng) -> Option<&RgbImage> {
        let index = self.sample_index(category, rng)?;
        self.page(category, index)
    }

    fn indices(&self, category: PageCategory) -> &[usize] {
        match category {
            PageCategory::Seamless => &self.seamless,
            PageCategory::Seamed => &self.seamed,
        }
    }

    fn indices_mut(&mut self, category: PageCategory) -> &mut Vec<usize> {
        match category {
            PageCategory::Seamless => &mut self.seamless,
            PageCategory::Seamed => &mut self.seamed,
        }
    }
}

fn check_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ScoreAugError::construction(path, "path does not exist"));
    }
    if !path.is_dir() {
        return Err(ScoreAugError::construction(path, "path is not a directory"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;

    fn write_page(dir: &Path, name: &str, shade: u8) {
        fs::create_dir_all(dir).unwrap();
        RgbImage::from_pixel(6, 4, Rgb([shade, shade, shade]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn loads_both_categories() {
        let tmp = tempfile::tempdir().unwrap();
        write_page(&tmp.path().join("seamless"), "a.png", 200);
        write_page(&tmp.path().join("seamless"), "b.png", 210);
        write_page(&tmp.path().join("seamed"), "c.png", 220);

        let pool = ImagePool::from_root(tmp.path(), &["png"]).unwrap();
        assert_eq!(pool.len(PageCategory::Seamless), 2);
        assert_eq!(pool.len(PageCategory::Seamed), 1);
        assert_eq!(
            pool.page(PageCategory::Seamed, 0).unwrap().get_pixel(0, 0),
            &Rgb([220, 220, 220])
        );
        // sorted by file name
        assert_eq!(
            pool.page(PageCategory::Seamless, 1).unwrap().get_pixel(0, 0),
            &Rgb([210, 210, 210])
        );
    }

    #[test]
    fn missing_seamed_directory_is_construction_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_page(&tmp.path().join("seamless"), "a.png", 200);

        let err = ImagePool::from_root(tmp.path(), &["png"]).unwrap_err();
        match err {
            ScoreAugError::Construction { path, .. } => assert!(path.ends_with("seamed")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn root_that_is_a_file_is_construction_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("pages");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            ImagePool::from_root(&file, &["png"]),
            Err(ScoreAugError::Construction { .. })
        ));
    }

    #[test]
    fn directory_without_pages_is_empty_pool_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_page(&tmp.path().join("seamless"), "a.png", 200);
        fs::create_dir_all(tmp.path().join("seamed")).unwrap();
        fs::write(tmp.path().join("seamed").join("readme.txt"), b"x").unwrap();

        assert!(matches!(
            ImagePool::from_root(tmp.path(), &["png"]),
            Err(ScoreAugError::EmptyPool {
                category: PageCategory::Seamed,
                ..
            })
        ));
    }

    #[test]
    fn sampling_stays_within_category() {
        let tmp = tempfile::tempdir().unwrap();
        write_page(&tmp.path().join("seamless"), "a.png", 10);
        write_page(&tmp.path().join("seamed"), "b.png", 250);
        write_page(&tmp.path().join("seamed"), "c.png", 251);

        let pool = ImagePool::from_root(tmp.path(), &["png"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let page = pool.sample(PageCategory::Seamed, &mut rng).unwrap();
            assert!(page.get_pixel(0, 0)[0] >= 250);
        }
        assert_eq!(
            pool.sample(PageCategory::Seamless, &mut rng).unwrap().get_pixel(0, 0),
            &Rgb([10, 10, 10])
        );
    }

    #[test]
    fn empty_pool_samples_nothing() {
        let pool = ImagePool::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pool.is_empty());
        assert!(pool.sample(PageCategory::Seamless, &mut rng).is_none());
    }
}
