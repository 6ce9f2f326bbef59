use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use art_atlas_media::FsImageStore;
use art_atlas_scraper::enrich::DEFAULT_IMAGE_DIR;
use art_atlas_scraper::{
    DatasetEvent, DatasetOptions, DatasetSummary, EnrichOptions, Enricher, ImageOutcome,
    WikipediaClient, enrich_dataset, load_dataset, save_dataset,
};

use crate::cli_types::BudgetArgs;
use crate::error::CliError;
use crate::settings::Settings;

pub(crate) struct EnrichArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub images_dir: PathBuf,
    pub image_prefix: Option<String>,
    pub images_only: bool,
    pub limit: Option<usize>,
    pub delay_ms: Option<u64>,
    pub budget: BudgetArgs,
}

/// Directory name recorded in `image_filename`: the explicit prefix, else the
/// last component of the images directory.
pub(crate) fn image_prefix(explicit: Option<&str>, images_dir: &Path) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| {
            images_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_IMAGE_DIR.to_string())
}

pub(crate) fn run_enrich(args: EnrichArgs, settings: Settings, quiet: bool) -> Result<(), CliError> {
    let mut http = settings.http;
    if let Some(delay) = args.delay_ms {
        http.request_delay_ms = delay;
    }
    let budget = args.budget.apply(settings.budget);

    let dataset = load_dataset(&args.input)?;
    let store = FsImageStore::open(&args.images_dir)?;
    let client = WikipediaClient::new(&http)?;

    let options = EnrichOptions {
        images_only: args.images_only,
        image_dir: image_prefix(args.image_prefix.as_deref(), &args.images_dir),
        page_base: http.page_base.clone(),
        max_download_bytes: http.max_download_bytes,
        budget,
    };
    let enricher = Enricher::new(&client, &store, options);
    let dataset_options = DatasetOptions {
        limit: args.limit,
        request_delay: http.request_delay(),
    };

    log::info!(
        "Enriching {} into {}",
        args.input.display().if_supports_color(Stdout, |t| t.cyan()),
        args.images_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    };

    let (enriched, summary) = enrich_dataset(&enricher, dataset, &dataset_options, |event| {
        match event {
            DatasetEvent::DatasetStarted { periods, artworks } => {
                pb.set_length(artworks as u64);
                pb.suspend(|| log::info!("{artworks} artworks in {periods} periods"));
            }
            DatasetEvent::PeriodStarted { name, artworks } => {
                pb.suspend(|| {
                    log::info!(
                        "{} ({artworks})",
                        name.if_supports_color(Stdout, |t| t.bold())
                    )
                });
            }
            DatasetEvent::ArtworkStarted { label, .. } => pb.set_message(label),
            DatasetEvent::ArtworkFinished { label, image, .. } => {
                pb.inc(1);
                pb.suspend(|| report_artwork(&label, &image));
            }
            DatasetEvent::Finished { .. } => pb.finish_and_clear(),
        }
    })?;

    save_dataset(&args.output, &enriched)?;
    print_summary(&summary, &args.output);
    Ok(())
}

fn report_artwork(label: &str, image: &ImageOutcome) {
    match image {
        ImageOutcome::Cached { file_name } => log::info!(
            "  {} {label} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            format!("(cached {file_name})").if_supports_color(Stdout, |t| t.dimmed()),
        ),
        ImageOutcome::Downloaded {
            file_name,
            source,
            byte_size,
            ..
        } => log::info!(
            "  {} {label} -> {file_name} ({byte_size} bytes, {source})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        ),
        ImageOutcome::NotFound => log::info!(
            "  {} {label} {}",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            "(no image)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        ImageOutcome::Failed { message } => log::warn!(
            "  {} {label}: {message}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        ),
    }
}

fn print_summary(summary: &DatasetSummary, output: &Path) {
    log::info!("");
    log::info!(
        "{} Enriched {} artworks, saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.processed,
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  Articles found:    {}", summary.articles_found);
    log::info!("  Images cached:     {}", summary.images_cached);
    log::info!("  Images downloaded: {}", summary.images_downloaded);
    log::info!("  Images missing:    {}", summary.images_missing);
    if summary.failures > 0 {
        log::warn!(
            "  {} {} artworks failed",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.failures,
        );
    }
    if summary.skipped > 0 {
        log::info!("  Skipped (limit):   {}", summary.skipped);
    }
}

#[cfg(test)]
#[path = "../tests/enrich_tests.rs"]
mod tests;
