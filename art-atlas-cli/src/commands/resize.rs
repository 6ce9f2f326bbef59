use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use art_atlas_media::{ResizeEvent, resize_directory};

use crate::cli_types::BudgetArgs;
use crate::error::CliError;
use crate::settings::Settings;

pub(crate) fn run_resize(
    dir: PathBuf,
    dry_run: bool,
    budget: BudgetArgs,
    settings: Settings,
) -> Result<(), CliError> {
    let budget = budget.apply(settings.budget);
    log::info!(
        "Checking {} against a {} byte budget{}",
        dir.display().if_supports_color(Stdout, |t| t.cyan()),
        budget.max_bytes,
        if dry_run { " (dry run)" } else { "" },
    );

    let mut over_budget = 0usize;
    let summary = resize_directory(&dir, &budget, dry_run, |event| match event {
        ResizeEvent::Scanned { total } => log::info!("Found {total} images"),
        ResizeEvent::WithinBudget { path, size } => {
            log::debug!("{} within budget ({size} bytes)", path.display())
        }
        ResizeEvent::WouldResize { path, size } => {
            over_budget += 1;
            log::info!(
                "  {} {} ({size} bytes)",
                "~".if_supports_color(Stdout, |t| t.yellow()),
                path.display(),
            )
        }
        ResizeEvent::Resized {
            path,
            before,
            after,
            quality,
        } => log::info!(
            "  {} {} {before} -> {after} bytes (quality {quality})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        ),
        ResizeEvent::Unchanged { path, size } => log::info!(
            "  {} {} kept ({size} bytes, no smaller)",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            path.display(),
        ),
        ResizeEvent::Failed { path, message } => log::warn!(
            "  {} {}: {message}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            path.display(),
        ),
    })?;

    log::info!("");
    if dry_run {
        log::info!("{over_budget} of {} images would be resized", summary.total);
    } else {
        log::info!(
            "{} Resized {} of {} images, saved {} bytes",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.resized,
            summary.total,
            summary.bytes_saved(),
        );
    }
    if summary.failed > 0 {
        log::warn!(
            "{} {} images could not be processed",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.failed,
        );
    }
    Ok(())
}
