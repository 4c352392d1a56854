//! ku-notify CLI
//!
//! Local execution entry point, meant to be run once per cron tick.
//! For AWS Lambda, use `ku-notify-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ku_notify::{
    error::Result,
    models::Config,
    notify::{self, LogNotifier, Notifier},
    pipeline,
    storage::{BatchStore, LocalStorage, MemoryStore},
};

/// ku-notify - Kerala University exam notification watcher
#[derive(Parser, Debug)]
#[command(name = "ku-notify", version, about = "Emails new exam portal notifications")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "ku-notify.toml")]
    config: PathBuf,

    /// Override the storage directory from the configuration
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the portal once, update the stored batch and send a digest
    Check {
        /// Compare against the stored batch without writing or emailing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration
    Validate,

    /// Show the currently stored batch
    Show,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config from {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };
    config.apply_env();
    if let Some(dir) = cli.storage_dir {
        config.storage.dir = dir;
    }

    let storage = LocalStorage::from_config(&config.storage);

    match cli.command {
        Command::Check { dry_run } => {
            config.validate()?;

            let report = if dry_run {
                log::info!("Dry run: changes are not stored and no email is sent");
                let scratch = MemoryStore::with_rows(storage.get_all().await?);
                pipeline::run_once(&config, &scratch, &LogNotifier).await?
            } else {
                let notifier: Box<dyn Notifier> = notify::from_config(&config.email)?;
                pipeline::run_once(&config, &storage, notifier.as_ref()).await?
            };

            log::info!("Report: {}", serde_json::to_string(&report)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Portal: {}", config.portal.url);
            log::info!(
                "✓ Filter: year {} with keywords {:?}",
                config.filter.year,
                config.filter.keywords
            );
            log::info!(
                "✓ Email: {}",
                if config.email.api_key.is_some() {
                    "enabled"
                } else {
                    "log only (RESEND_API_KEY not set)"
                }
            );
            log::info!("All validations passed!");
        }

        Command::Show => match storage.load_batch().await? {
            Some(batch) => {
                log::info!(
                    "{} rows stored at {} (updated {})",
                    batch.count,
                    storage.batch_path().display(),
                    batch.updated_at
                );
                for row in &batch.rows {
                    log::info!("{}", row.format("[{date}] {name} {link}"));
                }
            }
            None => log::info!("No batch stored yet."),
        },
    }

    Ok(())
}
