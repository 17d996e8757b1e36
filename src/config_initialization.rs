//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::Config;
use crate::cli::{Cli, Commands};

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<Config> {
    info!("Initializing configuration hierarchy");

    // Step 1: defaults, replaced by a config file when one is found
    let mut config = load_config_file(cli.config.clone(), std::env::var("QUADCUT_CONFIG").ok())?;

    // Step 2: override with environment variables
    let applied = config
        .apply_env(|key| std::env::var(key).ok())
        .context("Invalid environment override")?;
    if applied > 0 {
        info!("Applied {} environment variable overrides", applied);
    }

    // Step 3: override with CLI arguments
    apply_cli_configuration_overrides(&mut config, &cli.command);

    config.validate().context("Invalid configuration")?;
    info!("Configuration hierarchy initialized successfully");
    Ok(config)
}

/// Load the first config file found; an explicitly named file must exist
fn load_config_file(explicit: Option<PathBuf>, env_path: Option<String>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(&path)
            .with_context(|| format!("Cannot use config file {}", path.display()));
    }

    let from_env = env_path.is_some();
    for (index, path) in Config::default_locations(env_path).into_iter().enumerate() {
        if path.is_file() {
            return Config::load(&path)
                .with_context(|| format!("Cannot use config file {}", path.display()));
        }
        if index == 0 && from_env {
            anyhow::bail!("QUADCUT_CONFIG points to {}, which does not exist", path.display());
        }
        debug!("No config file at {}", path.display());
    }

    info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut Config, command: &Commands) {
    let mut cli_overrides = 0;

    let (tags, crf, preset) = match command {
        Commands::Tag(args) => (args.tags_file.as_ref(), None, None),
        Commands::Process(args) => (args.tags.as_ref(), args.crf, args.preset.as_ref()),
        Commands::Composite(args) => (None, args.crf, args.preset.as_ref()),
        Commands::SyncAudio(args) => (args.tags.as_ref(), None, None),
        _ => (None, None, None),
    };

    if let Some(tags) = tags {
        info!("CLI override: tags_file = {}", tags.display());
        config.paths.tags_file = tags.to_string_lossy().to_string();
        cli_overrides += 1;
    }
    if let Some(crf) = crf {
        info!("CLI override: crf = {}", crf);
        config.encode.crf = crf;
        cli_overrides += 1;
    }
    if let Some(preset) = preset {
        info!("CLI override: preset = {}", preset);
        config.encode.preset = preset.clone();
        cli_overrides += 1;
    }
    if let Commands::SyncAudio(args) = command {
        if let Some(score) = args.min_score {
            info!("CLI override: min_score = {}", score);
            config.sync.min_score = score;
            cli_overrides += 1;
        }
    }

    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_explicit_config_must_exist() {
        let result = load_config_file(Some(PathBuf::from("/nonexistent/quadcut.toml")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_config_must_exist() {
        let result = load_config_file(None, Some("/nonexistent/env.toml".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[encode]\npreset = \"slow\"").unwrap();

        let config = load_config_file(Some(file.path().to_path_buf()), None).unwrap();
        assert_eq!(config.encode.preset, "slow");
        assert_eq!(config.encode.crf, 18);
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::parse_from([
            "quadcut", "process", "--tags", "/tmp/tags.json", "--crf", "23", "--preset", "medium",
        ]);
        let mut config = Config::default();
        apply_cli_configuration_overrides(&mut config, &cli.command);

        assert_eq!(config.paths.tags_file, "/tmp/tags.json");
        assert_eq!(config.encode.crf, 23);
        assert_eq!(config.encode.preset, "medium");
    }

    #[test]
    fn test_sync_audio_overrides() {
        let cli = Cli::parse_from([
            "quadcut", "sync-audio", "--tags", "/tmp/tags.json", "--min-score", "0.2", "--dry-run",
        ]);
        let mut config = Config::default();
        apply_cli_configuration_overrides(&mut config, &cli.command);

        assert_eq!(config.paths.tags_file, "/tmp/tags.json");
        assert_eq!(config.sync.min_score, 0.2);
        match cli.command {
            Commands::SyncAudio(args) => {
                assert!(args.dry_run);
                assert!(args.video.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_out_of_range_crf() {
        assert!(Cli::try_parse_from(["quadcut", "process", "--crf", "60"]).is_err());
    }

    #[test]
    fn test_negative_noise_level_is_positional() {
        let cli = Cli::parse_from(["quadcut", "find-talks", "talk.mp4", "2.5", "-40"]);
        match cli.command {
            Commands::FindTalks(args) => {
                assert_eq!(args.min_gap, Some(2.5));
                assert_eq!(args.noise_db, Some(-40));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
