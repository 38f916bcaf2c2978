//! Configuration for the Focus Flow client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/focusflow/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use crate::app::Page;
use crate::dispatch::DEFAULT_CHANNEL_CAPACITY;
use crate::service::OwnershipPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Ownership checks were requested without saying who is acting.
    #[error("enforce_ownership is set but no actor was given (use --actor or [session] actor)")]
    MissingActor,
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    backend: BackendFileConfig,
    session: SessionFileConfig,
    ui: UiFileConfig,
    dispatch: DispatchFileConfig,
}

/// `[backend]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BackendFileConfig {
    latency_ms: Option<u64>,
    seed_demo_data: Option<bool>,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    actor: Option<String>,
    enforce_ownership: Option<bool>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
    start_page: Option<Page>,
    notification_ttl_secs: Option<u64>,
}

/// `[dispatch]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DispatchFileConfig {
    channel_capacity: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // -- Backend --
    /// Delay added to every in-memory service call.
    pub latency: Duration,
    /// Whether the in-memory store starts with demo data.
    pub seed_demo_data: bool,

    // -- Session --
    /// Name of the acting user.
    pub actor: Option<String>,
    /// Reject changes to entities assigned to someone other than `actor`.
    pub enforce_ownership: bool,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Date format for task cards older than yesterday (chrono).
    pub timestamp_format: String,
    /// Page shown at startup.
    pub start_page: Page,
    /// How long notifications stay in the status bar.
    pub notification_ttl: Duration,

    // -- Dispatch --
    /// Capacity of the command/event channels.
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(150),
            seed_demo_data: true,
            actor: None,
            enforce_ownership: false,
            poll_timeout: Duration::from_millis(50),
            timestamp_format: "%b %-d".to_string(),
            start_page: Page::Dashboard,
            notification_ttl: Duration::from_secs(3),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path
    /// (`~/.config/focusflow/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read or
    /// parsed, or if ownership checks are enabled without an actor.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        if config.enforce_ownership && config.actor.is_none() {
            return Err(ConfigError::MissingActor);
        }
        Ok(config)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            latency: cli
                .latency_ms
                .or(file.backend.latency_ms)
                .map_or(defaults.latency, Duration::from_millis),
            seed_demo_data: !cli.no_seed
                && file
                    .backend
                    .seed_demo_data
                    .unwrap_or(defaults.seed_demo_data),
            actor: cli
                .actor
                .clone()
                .or_else(|| file.session.actor.clone())
                .filter(|actor| !actor.trim().is_empty()),
            enforce_ownership: cli.enforce_ownership
                || file
                    .session
                    .enforce_ownership
                    .unwrap_or(defaults.enforce_ownership),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
            start_page: cli
                .start_page
                .or(file.ui.start_page)
                .unwrap_or(defaults.start_page),
            notification_ttl: file
                .ui
                .notification_ttl_secs
                .map_or(defaults.notification_ttl, Duration::from_secs),
            channel_capacity: file
                .dispatch
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
        }
    }

    /// The ownership policy for this session, if enforcement is on.
    #[must_use]
    pub fn ownership_policy(&self) -> Option<OwnershipPolicy> {
        if !self.enforce_ownership {
            return None;
        }
        self.actor.as_deref().map(OwnershipPolicy::new)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task and project tracker")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/focusflow/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the acting user.
    #[arg(long, env = "FOCUSFLOW_ACTOR")]
    pub actor: Option<String>,

    /// Only allow changes to entities assigned to the actor (or unassigned).
    #[arg(long)]
    pub enforce_ownership: bool,

    /// Simulated delay for every backend call, in milliseconds.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Start with an empty store instead of the demo data.
    #[arg(long)]
    pub no_seed: bool,

    /// Page shown at startup.
    #[arg(long, value_enum)]
    pub start_page: Option<Page>,

    /// Date format for task cards (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "FOCUSFLOW_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/focusflow.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("focusflow").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
