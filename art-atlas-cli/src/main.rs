//! art-atlas CLI
//!
//! Enriches artwork datasets with encyclopedia text and size-bounded images,
//! and maintains the local image cache.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;

use clap::Parser;
use env_logger::{Env, Target};
use log::Level;

use cli_types::{Cli, Commands};
use commands::EnrichArgs;
use error::CliError;
use settings::{Settings, settings_path};

/// Route user-facing output through `log`. Info lines print bare so they read
/// like ordinary output; other levels carry their level name.
fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "warn"
    } else if verbose {
        "warn,art_atlas=debug"
    } else {
        "warn,art_atlas=info"
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.target(Target::Stdout);
    if verbose {
        builder.format_timestamp_secs();
    } else {
        builder.format(|buf, record| {
            if record.level() == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
        });
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli.config.clone().unwrap_or_else(settings_path);
    let settings = Settings::load(&path)?;

    match cli.command {
        Commands::Enrich {
            input,
            output,
            images_dir,
            image_prefix,
            images_only,
            limit,
            delay_ms,
            budget,
        } => commands::run_enrich(
            EnrichArgs {
                input,
                output,
                images_dir,
                image_prefix,
                images_only,
                limit,
                delay_ms,
                budget,
            },
            settings,
            cli.quiet,
        ),
        Commands::Resize {
            dir,
            dry_run,
            budget,
        } => commands::run_resize(dir, dry_run, budget, settings),
        Commands::Locate { title } => commands::run_locate(&title, settings),
        Commands::Key { artist, title } => {
            commands::run_key(&artist, &title);
            Ok(())
        }
        Commands::Config { action } => commands::run_config(action, &path, &settings),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
