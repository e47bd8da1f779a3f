use clap::Parser;
use config::{Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// Using constants for default values makes them easy to change.
pub const DEFAULT_MAX_DEPTH: usize = 4;
// Render and tree walks recurse per level, so the configurable depth is capped.
pub const MAX_DEPTH_LIMIT: usize = 32;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SHOW_SUMMARY: bool = true;
const DATA_FILE_NAME: &str = "gl-definitions.json";
const LOG_FILE_NAME: &str = "gldef-rs.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Failed to determine config directory")]
    DirectoryNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Optional fields allow for layered config (defaults -> file -> env -> args).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    max_depth: Option<usize>,
    data_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    show_summary: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deepest level a new grouping may be created at.
    pub max_depth: usize,
    /// JSON file backing the local service. `None` runs in memory only.
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "gldef_rs=debug".
    pub log_level: String,
    /// Show item/account counts next to first-level groupings.
    pub show_summary: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            data_file: None,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            show_summary: DEFAULT_SHOW_SUMMARY,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and arrange general ledger definitions", long_about = None)]
pub struct CliArgs {
    /// JSON data file holding the grouping tree and account catalog
    pub data_file: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub max_depth: Option<usize>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub show_summary: Option<bool>,

    /// Start from a built-in sample chart of accounts kept in memory
    #[arg(long)]
    pub demo: bool,

    /// Print the tree outline and exit
    #[arg(long)]
    pub print: bool,

    /// Expand every grouping when printing
    #[arg(long, requires = "print")]
    pub expand_all: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "gldef-rs")
}

pub fn default_data_file() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
        .ok_or(ConfigError::DirectoryNotFound)
}

pub fn default_log_file() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
        .ok_or(ConfigError::DirectoryNotFound)
}

pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix("GLDEF").separator("__");
    // Missing env vars are fine; treat a failed collect as no overrides.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config_from_args(args, Some(env_map))
}

// Separate function to allow testing with specific args and override sources
fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args
        .config
        .clone()
        .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    // Environment (or test) overrides take priority over the file.
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;

    // Args > overrides > file > defaults
    let config = AppConfig {
        max_depth: args
            .max_depth
            .or(loaded.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH),
        data_file: args.data_file.clone().or(loaded.data_file),
        log_file: args.log_file.clone().or(loaded.log_file),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        show_summary: args
            .show_summary
            .or(loaded.show_summary)
            .unwrap_or(DEFAULT_SHOW_SUMMARY),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "max_depth must be at most {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }
    if config.log_level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "log_level must not be empty".to_string(),
        ));
    }
    Ok(())
}
