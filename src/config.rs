use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::game::{Difficulty, TimeoutPolicy};

const SETTINGS_FILE_NAME: &str = "settings.json";
const ENV_DIFFICULTY: &str = "MAGIC_MATCH_DIFFICULTY";
const ENV_ON_TIMEOUT: &str = "MAGIC_MATCH_ON_TIMEOUT";
const ENV_SEED: &str = "MAGIC_MATCH_SEED";

#[derive(Parser, Debug, Default)]
#[command(name = "magic-match", version, about = "Find every pair before the clock runs out")]
pub struct Cli {
    /// Starting difficulty: easy, medium or hard.
    #[arg(long)]
    pub difficulty: Option<Difficulty>,
    /// What happens when the clock hits zero: restart or defeat.
    #[arg(long = "on-timeout")]
    pub on_timeout: Option<TimeoutPolicy>,
    /// Seed for deterministic shuffles.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Settings file (JSON). Defaults to ~/.config/magic-match/settings.json.
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub on_timeout: TimeoutPolicy,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    difficulty: Option<Difficulty>,
    on_timeout: Option<TimeoutPolicy>,
    seed: Option<u64>,
}

pub fn default_settings_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(
        PathBuf::from(home)
            .join(".config/magic-match")
            .join(SETTINGS_FILE_NAME),
    )
}

pub fn load_settings(cli: &Cli) -> Result<Settings> {
    load_settings_with(cli, |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then `env`, then the command line.
pub fn load_settings_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let mut settings = Settings::default();

    let file = match &cli.settings {
        Some(path) => Some(read_settings_file(path)?),
        None => match default_settings_path() {
            Some(path) => read_optional_settings_file(&path)?,
            None => None,
        },
    };
    if let Some(file) = file {
        if let Some(v) = file.difficulty {
            settings.difficulty = v;
        }
        if let Some(v) = file.on_timeout {
            settings.on_timeout = v;
        }
        if file.seed.is_some() {
            settings.seed = file.seed;
        }
    }

    if let Some(v) = env(ENV_DIFFICULTY) {
        settings.difficulty = v.parse()?;
    }
    if let Some(v) = env(ENV_ON_TIMEOUT) {
        settings.on_timeout = v.parse()?;
    }
    if let Some(v) = env(ENV_SEED) {
        let seed = v.trim().parse().map_err(|_| Error::InvalidSeed(v.clone()))?;
        settings.seed = Some(seed);
    }

    if let Some(v) = cli.difficulty {
        settings.difficulty = v;
    }
    if let Some(v) = cli.on_timeout {
        settings.on_timeout = v;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    debug!(?settings, "settings resolved");
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let raw = fs::read_to_string(path).map_err(|source| Error::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::SettingsFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_settings_file(path: &Path) -> Result<Option<SettingsFile>> {
    match read_settings_file(path) {
        Ok(file) => Ok(Some(file)),
        Err(Error::SettingsIo { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
