use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::ConfigAction;
use crate::error::CliError;
use crate::settings::Settings;

pub(crate) fn run_config(
    action: ConfigAction,
    path: &Path,
    settings: &Settings,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => {
            log::info!(
                "{}",
                format!("# {}", path.display()).if_supports_color(Stdout, |t| t.dimmed())
            );
            log::info!("{}", settings.to_toml()?.trim_end());
        }
        ConfigAction::Path => log::info!("{}", path.display()),
        ConfigAction::Init => {
            if Settings::default().write_if_missing(path)? {
                log::info!(
                    "{} Wrote default settings to {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    path.display(),
                );
            } else {
                log::warn!("Settings file already exists: {}", path.display());
            }
        }
    }
    Ok(())
}
