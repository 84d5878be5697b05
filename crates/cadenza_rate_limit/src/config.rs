//! Workspace TOML configuration.
//!
//! Configuration is layered: bundled defaults (include_str! from
//! cadenza.toml), then `~/.config/cadenza/cadenza.toml`, then
//! `./cadenza.toml`, with later sources taking precedence.

use cadenza_core::CadenceRules;
use cadenza_error::{CadenzaError, CadenzaResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Dispatch and retry settings for the executor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublishSection {
    /// Seconds allowed for one dispatch to the platform publisher
    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,
    /// Consecutive dispatch failures before a job is terminally failed
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before a rate-limited job is re-checked, in seconds
    #[serde(default = "default_rate_limit_requeue_secs")]
    pub rate_limit_requeue_secs: u64,
}

fn default_dispatch_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit_requeue_secs() -> u64 {
    60
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: default_dispatch_timeout_secs(),
            max_retries: default_max_retries(),
            rate_limit_requeue_secs: default_rate_limit_requeue_secs(),
        }
    }
}

/// Rolling call-budget settings for the publish window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitSection {
    /// Rolling window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Calls allowed per platform within the window
    #[serde(default = "default_max_calls")]
    pub max_calls: u32,
    /// Per-platform overrides of `max_calls`, keyed by platform name
    #[serde(default)]
    pub platforms: HashMap<String, u32>,
}

fn default_window_secs() -> u64 {
    3600
}

fn default_max_calls() -> u32 {
    10
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_calls: default_max_calls(),
            platforms: HashMap::new(),
        }
    }
}

/// Default cadence rules applied when the caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CadenceSection {
    /// Minimum hours between publishes for the same (account, platform)
    #[serde(default)]
    pub min_hours_between: Option<i64>,
    /// Maximum publishes in any trailing 7-day window
    #[serde(default)]
    pub max_posts_per_week: Option<usize>,
}

impl CadenceSection {
    /// The section as scheduler cadence rules.
    pub fn rules(&self) -> CadenceRules {
        CadenceRules {
            min_hours_between: self.min_hours_between,
            max_posts_per_week: self.max_posts_per_week,
        }
    }
}

/// Global publish gate policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GateSection {
    /// Whether clearing the pause flag requires two-step confirmation
    #[serde(default)]
    pub resume_requires_confirmation: bool,
}

/// Top-level Cadenza configuration.
///
/// # Example
///
/// ```no_run
/// use cadenza_rate_limit::CadenzaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CadenzaConfig::load()?;
/// println!("dispatch timeout: {}s", config.publish.dispatch_timeout_secs);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CadenzaConfig {
    /// Dispatch and retry settings
    #[serde(default)]
    pub publish: PublishSection,
    /// Rolling call-budget settings
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    /// Default cadence rules
    #[serde(default)]
    pub cadence: CadenceSection,
    /// Global publish gate policy
    #[serde(default)]
    pub gate: GateSection,
}

// Bundled default configuration, shipped with the workspace.
const DEFAULT_CONFIG: &str = include_str!("../../../cadenza.toml");

impl CadenzaConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> CadenzaResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load only the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled TOML fails to parse.
    pub fn bundled() -> CadenzaResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to build bundled configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to parse bundled configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Sources in order of precedence (later override earlier):
    /// 1. Bundled defaults (cadenza.toml shipped with the workspace)
    /// 2. User config in home directory (~/.config/cadenza/cadenza.toml)
    /// 3. User config in current directory (./cadenza.toml)
    ///
    /// User config files are optional and silently skipped if absent.
    #[instrument]
    pub fn load() -> CadenzaResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cadenza/cadenza.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("cadenza").required(false));

        builder
            .build()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CadenzaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = CadenzaConfig::default();
        assert_eq!(config.publish.dispatch_timeout_secs, 30);
        assert_eq!(config.publish.max_retries, 3);
        assert_eq!(config.rate_limit.window_secs, 3600);
        assert!(!config.gate.resume_requires_confirmation);
        assert_eq!(config.cadence.rules(), CadenceRules::default());
    }

    #[test]
    fn bundled_defaults_parse() {
        let config = CadenzaConfig::bundled().unwrap();
        assert_eq!(config.publish.max_retries, 3);
        assert_eq!(config.rate_limit.platforms.get("discord"), Some(&50));
        assert!(config.gate.resume_requires_confirmation);
        assert_eq!(config.cadence.min_hours_between, Some(4));
    }
}
