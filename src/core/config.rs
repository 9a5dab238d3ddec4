//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.routestack/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::Scenario;
use crate::core::scheduler::DEFAULT_STEP_DELAY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoutestackConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub step_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    pub scenario: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const STEP_DELAY_ENV: &str = "ROUTESTACK_STEP_DELAY_MS";
pub const LOG_LEVEL_ENV: &str = "ROUTESTACK_LOG_LEVEL";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub step_delay: Duration,
    pub log_level: LevelFilter,
    pub scenario: Scenario,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub step_delay_ms: Option<u64>,
    pub scenario: Option<Scenario>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.routestack/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".routestack").join("config.toml"))
}

/// Load config from `path`, or from `~/.routestack/config.toml` when `None`.
///
/// A missing default file is generated (commented out) and yields
/// `RoutestackConfig::default()`. A missing explicit file is an error.
/// A malformed file returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<RoutestackConfig, ConfigError> {
    if let Some(path) = path {
        return read_config(path);
    }

    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(RoutestackConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RoutestackConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<RoutestackConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<RoutestackConfig, ConfigError> {
    let config: RoutestackConfig = toml::from_str(contents).map_err(ConfigError::Parse)?;
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Routestack Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# step_delay_ms = 650                # Pause between structural route changes
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"

# [demo]
# scenario = "indexed"               # "indexed" or "identified"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoutestackConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &RoutestackConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Step delay: CLI → env → config → default
    let step_delay = cli
        .step_delay_ms
        .or_else(|| env(STEP_DELAY_ENV).and_then(|v| parse_or_warn::<u64>(STEP_DELAY_ENV, &v)))
        .or(config.general.step_delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_STEP_DELAY);

    // Log level: env → config → default
    let log_level = env(LOG_LEVEL_ENV)
        .or_else(|| config.general.log_level.clone())
        .and_then(|v| parse_or_warn::<LevelFilter>("log_level", &v))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Scenario: CLI → config → default
    let scenario = cli
        .scenario
        .or_else(|| {
            config.demo.scenario.as_deref().and_then(|name| {
                <Scenario as ValueEnum>::from_str(name, true)
                    .inspect_err(|e| warn!("Ignoring scenario {name:?}: {e}"))
                    .ok()
            })
        })
        .unwrap_or_default();

    ResolvedConfig {
        step_delay,
        log_level,
        scenario,
    }
}

fn parse_or_warn<T: FromStr>(name: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {name} value {value:?}");
            None
        }
    }
}
