use crate::config::ScoreAugConfig;
use crate::decisions::{rng_for_sample, Decisions};
use crate::error::Result;
use crate::pool::PageCategory;
use crate::sample::{Annotations, SampleRecord};
use crate::transform::ScoreAug;
use crate::utils::files::{ensure_directories, list_files_with_extensions, SAMPLE_EXTENSIONS};
use crate::utils::images::{load_rgb, save_png, validate_image};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Augmentation parameters
#[derive(Args, Debug, Clone)]
pub struct AugmentationArgs {
    /// Directory with seamless/ and seamed/ blank page folders
    #[arg(short, long)]
    pub blank_pages: Option<PathBuf>,

    /// JSON config for the transform (CLI flags override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of score images, each with an optional <stem>.json box sidecar
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory to write augmented images and sidecars into
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of augmented versions to generate per image
    #[arg(short, long, default_value_t = 5)]
    pub amount: u32,

    /// Pixels added to each axis for seamed pages
    #[arg(long)]
    pub padding_length: Option<u32>,

    /// Base seed; each output derives its own stream from it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Let the drawn contrast/brightness/blur gates skip their effect
    #[arg(long, default_value_t = false)]
    pub honor_gates: bool,

    /// Verify image integrity after augmentation
    #[arg(long, default_value_t = false)]
    pub verify: bool,
}

impl AugmentationArgs {
    /// Merge the optional config file with command line overrides
    pub fn transform_config(&self) -> Result<ScoreAugConfig> {
        let mut config = match (&self.config, &self.blank_pages) {
            (Some(path), _) => ScoreAugConfig::from_json_file(path)?,
            (None, Some(pages)) => ScoreAugConfig::new(pages),
            (None, None) => {
                return Err(crate::ScoreAugError::InvalidConfig(
                    "either --blank-pages or --config is required".into(),
                ))
            }
        };

        if let Some(pages) = &self.blank_pages {
            config.blank_pages_path = pages.clone();
        }
        if let Some(padding_length) = self.padding_length {
            config.padding_length = padding_length;
        }
        if self.honor_gates {
            config.honor_gates = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Statistics for augmentation process
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AugmentationStats {
    pub input_images: usize,
    pub augmented_images: usize,
    pub failed_images: usize,
    pub seamless: usize,
    pub seamed: usize,
    pub padded: usize,
    pub cropped: usize,
    pub corrupted_images: usize,
    pub verified_images: usize,
}

#[derive(Default)]
struct Counters {
    augmented: AtomicUsize,
    failed: AtomicUsize,
    seamless: AtomicUsize,
    seamed: AtomicUsize,
    padded: AtomicUsize,
    cropped: AtomicUsize,
}

impl Counters {
    fn record(&self, decisions: &Decisions) {
        self.augmented.fetch_add(1, Ordering::Relaxed);
        match decisions.category {
            PageCategory::Seamless => self.seamless.fetch_add(1, Ordering::Relaxed),
            PageCategory::Seamed => self.seamed.fetch_add(1, Ordering::Relaxed),
        };
        if decisions.needs_padding() {
            self.padded.fetch_add(1, Ordering::Relaxed);
        }
        if decisions.crop.is_some() {
            self.cropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Apply augmentations to every image under `args.input`
pub async fn augment_dataset(args: AugmentationArgs) -> Result<AugmentationStats> {
    let config = args.transform_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    println!("Starting augmentation process...");
    println!("Input directory: {}", args.input.display());
    println!("Blank pages: {}", config.blank_pages_path.display());
    println!("Augmentations per image: {}", args.amount);
    println!("Seed: {}", seed);

    let aug = ScoreAug::new(config)?;
    tracing::info!("{}", aug);

    ensure_directories(&[args.output.clone()])?;

    let input = args.input.clone();
    let output = args.output.clone();
    let amount = args.amount;
    let mut stats = tokio::task::spawn_blocking(move || {
        process_directory(&aug, &input, &output, amount, seed)
    })
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

    if args.verify {
        println!("\n🔍 Verifying image integrity...");
        let (corrupted, verified) = verify_images(&args.output)?;
        stats.corrupted_images = corrupted;
        stats.verified_images = verified;
    }

    print_augmentation_stats(&stats, args.verify);

    if stats.corrupted_images > 0 {
        println!(
            "\n⚠️  Warning: {} corrupted images found!",
            stats.corrupted_images
        );
    }

    println!("Augmentation process completed successfully!");
    Ok(stats)
}

/// Augment every sample in `input_dir` `amount` times, in parallel
pub fn process_directory(
    aug: &ScoreAug,
    input_dir: &Path,
    output_dir: &Path,
    amount: u32,
    seed: u64,
) -> Result<AugmentationStats> {
    let image_files = list_files_with_extensions(input_dir, &SAMPLE_EXTENSIONS)?;

    if image_files.is_empty() {
        println!("No images found in {}", input_dir.display());
        return Ok(AugmentationStats::default());
    }

    println!("Found {} images", image_files.len());

    let progress_bar = ProgressBar::new(image_files.len() as u64 * amount as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress_bar.set_message("Augmenting scores");

    let counters = Counters::default();

    image_files
        .par_iter()
        .enumerate()
        .for_each(|(index, image_path)| {
            for version in 0..amount {
                let stream = index as u64 * amount as u64 + version as u64;
                match augment_file(aug, image_path, output_dir, version + 1, seed, stream) {
                    Ok(decisions) => counters.record(&decisions),
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!("failed to augment {}: {}", image_path.display(), e);
                    }
                }
                progress_bar.inc(1);
            }
        });

    progress_bar.finish_with_message("Completed augmentation");

    Ok(AugmentationStats {
        input_images: image_files.len(),
        augmented_images: counters.augmented.into_inner(),
        failed_images: counters.failed.into_inner(),
        seamless: counters.seamless.into_inner(),
        seamed: counters.seamed.into_inner(),
        padded: counters.padded.into_inner(),
        cropped: counters.cropped.into_inner(),
        ..Default::default()
    })
}

/// Augment one image and write `<stem>_<NNNN>.png` plus its box sidecar
fn augment_file(
    aug: &ScoreAug,
    image_path: &Path,
    output_dir: &Path,
    version: u32,
    seed: u64,
    stream: u64,
) -> Result<Decisions> {
    let sample = load_sample(image_path)?;
    let mut rng = rng_for_sample(seed, stream);
    let (augmented, decisions) = aug.apply_traced(sample, &mut rng)?;

    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample".to_string());
    let output_stem = format!("{}_{:04}", stem, version);

    save_png(&augmented.img, &output_dir.join(format!("{}.png", output_stem)))?;
    Annotations::from(&augmented).write(&output_dir.join(format!("{}.json", output_stem)))?;

    Ok(decisions)
}

/// Load an image and its `<stem>.json` sidecar if one exists
pub fn load_sample(image_path: &Path) -> Result<SampleRecord> {
    let img = load_rgb(image_path)?;

    let sidecar = image_path.with_extension("json");
    let annotations = if sidecar.is_file() {
        Annotations::read(&sidecar)?
    } else {
        Annotations::default()
    };

    let filename = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(SampleRecord::from_image(img, annotations.bboxes, filename))
}

/// Returns (corrupted, verified) counts for the PNGs in `dir`
fn verify_images(dir: &Path) -> std::io::Result<(usize, usize)> {
    let mut corrupted = 0;
    let mut verified = 0;

    for image_path in list_files_with_extensions(dir, &["png"])? {
        match validate_image(&image_path) {
            Ok(()) => verified += 1,
            Err(_) => {
                corrupted += 1;
                eprintln!("❌ Corrupted image: {}", image_path.display());
            }
        }
    }

    Ok((corrupted, verified))
}

/// Print augmentation statistics
fn print_augmentation_stats(stats: &AugmentationStats, verified: bool) {
    println!("\n🎯 Augmentation Statistics:");
    println!("  📷 Input images: {}", stats.input_images);
    println!("  ➕ Augmented images created: {}", stats.augmented_images);
    if stats.failed_images > 0 {
        println!("  ❌ Failed augmentations: {}", stats.failed_images);
    }
    println!("\n📄 Backgrounds:");
    println!("  Seamless pages: {}", stats.seamless);
    println!("  Seamed pages:   {}", stats.seamed);
    println!("  Padded:         {}", stats.padded);
    println!("  Crop-resized:   {}", stats.cropped);

    if verified {
        println!("\n🔍 Image verification:");
        println!("  ✅ Verified images: {}", stats.verified_images);
        if stats.corrupted_images > 0 {
            println!("  ❌ Corrupted images: {}", stats.corrupted_images);
        } else {
            println!("  🎉 All images verified successfully!");
        }
    }
}
