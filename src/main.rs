use clap::{Parser, Subcommand};
use score_aug::augmentation::{self, AugmentationArgs};
use score_aug::utils::files::DEFAULT_PAGE_EXTENSIONS;
use score_aug::{logging, ImagePool, PageCategory};
use std::path::PathBuf;

/// Augment sheet-music training samples with real-world blank pages
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate augmented versions of every score image in a directory
    Augment(AugmentationArgs),
    /// Load the blank page pool and report what it holds
    Pages {
        /// Directory with seamless/ and seamed/ blank page folders
        #[arg(short, long)]
        blank_pages: PathBuf,

        /// Accepted page file extensions
        #[arg(short, long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}", e);
    }

    match cli.command {
        Commands::Augment(args) => {
            if let Err(e) = augmentation::augment_dataset(args).await {
                eprintln!("Error during augmentation: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Pages {
            blank_pages,
            extensions,
        } => {
            let extensions = extensions.unwrap_or_else(|| {
                DEFAULT_PAGE_EXTENSIONS
                    .iter()
                    .map(|e| e.to_string())
                    .collect()
            });

            match ImagePool::from_root(&blank_pages, extensions.as_slice()) {
                Ok(pool) => {
                    println!("Blank pages in {}:", blank_pages.display());
                    for category in PageCategory::ALL {
                        println!("  {:<9} {}", category.dir_name(), pool.len(category));
                    }
                }
                Err(e) => {
                    eprintln!("Error loading blank pages: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
