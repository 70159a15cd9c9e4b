use anyhow::{Context, Result, bail};
use clap::Parser;
use queryvoice::analysis::ResultPayload;
use queryvoice::cli::{Cli, Commands, ConfigAction, verbosity};
use queryvoice::config::Config;
use queryvoice::narration::narration_text;
use queryvoice::voice::{NameHeuristic, Voice, VoicePreference};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    queryvoice::logging::init(verbosity(&cli));

    match cli.command {
        Commands::Narrate { file, currency } => {
            let config = load_config(cli.config.as_deref())?;
            narrate(&file, currency.as_deref().unwrap_or(&config.narration.currency))?;
        }
        Commands::SelectVoice { file, lang } => {
            let config = load_config(cli.config.as_deref())?;
            let lang = lang.unwrap_or_else(|| config.narration.language.clone());
            select_voice(&config, &file, &lang)?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// Load configuration from a custom path, or the default path when present.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn narrate(file: &Path, currency: &str) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let payload = ResultPayload::from_json(&json)
        .with_context(|| format!("invalid analysis result in {}", file.display()))?;
    println!("{}", narration_text(&payload, currency));
    Ok(())
}

fn select_voice(config: &Config, file: &Path, lang: &str) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let voices: Vec<Voice> = serde_json::from_str(&json)
        .with_context(|| format!("invalid voice list in {}", file.display()))?;

    let heuristic = NameHeuristic::from_config(&config.voices);
    match heuristic.select(&voices, lang) {
        Some(voice) => println!("{}\t{}", voice.id, voice),
        None => println!("No preferred voice found; the platform default voice will be used."),
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = match custom_path {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };

    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            Config::default().save(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
    }

    Ok(())
}
