use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default extensions accepted for blank pages
pub const DEFAULT_PAGE_EXTENSIONS: [&str; 1] = ["png"];

/// Extensions accepted for input samples
pub const SAMPLE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Ensure the output directories exist
pub fn ensure_directories(dirs: &[PathBuf]) -> io::Result<()> {
    // Check which directories don't exist
    let missing_dirs: Vec<&PathBuf> = dirs.par_iter().filter(|dir| !dir.exists()).collect();

    missing_dirs
        .par_iter()
        .try_for_each(|dir| -> io::Result<()> {
            fs::create_dir_all(dir)?;
            tracing::info!("created directory {}", dir.display());
            Ok(())
        })
}

/// Check if a file has one of the given extensions (case-insensitive)
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    if let Some(extension) = path.extension() {
        let ext = extension.to_string_lossy().to_lowercase();
        extensions
            .iter()
            .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(&ext))
    } else {
        false
    }
}

/// List files directly under `dir` with an accepted extension, sorted by name
pub fn list_files_with_extensions<S: AsRef<str>>(
    dir: &Path,
    extensions: &[S],
) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extensions) {
                Some(path)
            } else {
                None
            }
        })
        .collect();

    files.sort();
    Ok(files)
}
