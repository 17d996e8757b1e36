//! quadcut CLI
//!
//! Tags, analyses and composites 4-up lecture recordings.
//!
//! # Usage
//!
//! ```bash
//! quadcut tag ~/videos
//! quadcut find-talks lecture.mp4 3.0 -35
//! quadcut detect-slides lecture.mp4 0.1 top-right
//! quadcut process ~/gpc-bg.png ~/videos/processed
//! quadcut sync-audio --dry-run
//! quadcut download /Recordings/2024 ./incoming
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use quadcut::adapters::{init_logging, LogFormat};
use quadcut::app::container::DefaultAppContainer;
use quadcut::cli::{commands, Cli, Commands};
use quadcut::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the quadcut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&cli.log_level, format)?;

    let config = initialize_configuration_hierarchy(&cli)?;
    let container = DefaultAppContainer::new(config)?;

    // Execute the requested command
    match cli.command {
        Commands::Tag(args) => {
            info!("Executing tag command");
            commands::tag(&container, args).await?;
        }
        Commands::FindTalks(args) => {
            info!("Executing find-talks command");
            commands::find_talks(&container, args).await?;
        }
        Commands::DetectCuts(args) => {
            info!("Executing detect-cuts command");
            commands::detect_cuts(&container, args).await?;
        }
        Commands::Preview(args) => {
            info!("Executing preview command");
            commands::preview(&container, args).await?;
        }
        Commands::DetectSlides(args) => {
            info!("Executing detect-slides command");
            commands::detect_slides(&container, args).await?;
        }
        Commands::Process(args) => {
            info!("Executing process command");
            commands::process(&container, args).await?;
        }
        Commands::Composite(args) => {
            info!("Executing composite command");
            commands::composite(&container, args).await?;
        }
        Commands::SyncAudio(args) => {
            info!("Executing sync-audio command");
            commands::sync_audio(&container, args).await?;
        }
        Commands::Download(args) => {
            info!("Executing download command");
            commands::download(&container, args).await?;
        }
        Commands::Upload(args) => {
            info!("Executing upload command");
            commands::upload(&container, args).await?;
        }
        Commands::Doctor => {
            info!("Executing doctor command");
            commands::doctor(&container).await?;
        }
    }

    info!("quadcut completed successfully");
    Ok(())
}
