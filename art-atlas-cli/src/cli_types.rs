//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use art_atlas_media::TranscodeBudget;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "art-atlas")]
#[command(
    about = "Enrich artwork datasets with encyclopedia metadata and size-bounded images",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the transcode budget from the settings file.
#[derive(Args, Clone, Default)]
pub(crate) struct BudgetArgs {
    /// Maximum stored image size in bytes
    #[arg(long)]
    pub max_bytes: Option<u64>,

    /// Maximum length of the longer image edge in pixels
    #[arg(long)]
    pub max_dimension: Option<u32>,
}

impl BudgetArgs {
    pub(crate) fn apply(&self, mut budget: TranscodeBudget) -> TranscodeBudget {
        if let Some(max_bytes) = self.max_bytes {
            budget.max_bytes = max_bytes;
        }
        if let Some(max_dimension) = self.max_dimension {
            budget.max_dimension = max_dimension;
        }
        budget
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Enrich a dataset with article text and cached images
    Enrich {
        /// Input dataset: JSON object of period name to artwork list
        #[arg(default_value = "dataset.json")]
        input: PathBuf,

        /// Where to write the enriched dataset
        #[arg(short, long, default_value = "dataset_complete.json")]
        output: PathBuf,

        /// Directory holding stored images
        #[arg(long, default_value = "images")]
        images_dir: PathBuf,

        /// Directory name recorded in `image_filename` (default: name of --images-dir)
        #[arg(long)]
        image_prefix: Option<String>,

        /// Only resolve images; skip description and infobox lookups
        #[arg(long)]
        images_only: bool,

        /// Maximum number of artworks to process
        #[arg(short, long)]
        limit: Option<usize>,

        /// Pause between artworks in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Shrink stored images that exceed the size budget, in place
    Resize {
        /// Directory of stored images
        #[arg(default_value = "images")]
        dir: PathBuf,

        /// Show which images would be resized without changing them
        #[arg(short = 'n', long)]
        dry_run: bool,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Find the image the enrichment pipeline would use for an article
    Locate {
        /// Article title
        title: String,
    },

    /// Print the cache key for an artwork
    Key {
        artist: String,
        title: String,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings as TOML
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values if none exists
    Init,
}
