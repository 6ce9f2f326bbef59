use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use art_atlas_scraper::{ImageLocator, WikipediaClient};

use crate::error::CliError;
use crate::settings::Settings;

pub(crate) fn run_locate(title: &str, settings: Settings) -> Result<(), CliError> {
    let client = WikipediaClient::new(&settings.http)?;
    match ImageLocator::new(&client).locate(title) {
        Some(image) => {
            log::info!("{}", image.url);
            log::info!(
                "  {}",
                format!("via {}", image.source).if_supports_color(Stdout, |t| t.dimmed())
            );
        }
        None => log::info!(
            "{} No image found for {title:?}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        ),
    }
    Ok(())
}
