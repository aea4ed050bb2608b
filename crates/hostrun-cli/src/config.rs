//! Environment-driven configuration for the hostrun binary.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Base URL of the remote-execution agent API.
pub const ENV_AGENT_URL: &str = "HOSTRUN_AGENT_URL";
/// Required name tag of the target host.
pub const ENV_TARGET_NAME: &str = "HOSTRUN_TARGET_NAME";
/// Required lifecycle state of the target host.
pub const ENV_TARGET_STATE: &str = "HOSTRUN_TARGET_STATE";
/// Path of the script file to dispatch.
pub const ENV_SCRIPT: &str = "HOSTRUN_SCRIPT";
/// Where the JSON report is written.
pub const ENV_REPORT_PATH: &str = "HOSTRUN_REPORT_PATH";
/// Delay between status queries, in seconds.
pub const ENV_POLL_INTERVAL_SECS: &str = "HOSTRUN_POLL_INTERVAL_SECS";
/// Polling deadline, in seconds.
pub const ENV_MAX_WAIT_SECS: &str = "HOSTRUN_MAX_WAIT_SECS";
/// Transient status query retries.
pub const ENV_STATUS_RETRIES: &str = "HOSTRUN_STATUS_RETRIES";

const DEFAULT_AGENT_URL: &str = "http://127.0.0.1:7070";
const DEFAULT_TARGET_STATE: &str = "running";
const DEFAULT_REPORT_PATH: &str = "deploy-output.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_MAX_WAIT_SECS: u64 = 600;
const DEFAULT_STATUS_RETRIES: u32 = 3;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Configuration read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote-execution agent API.
    pub agent_url: String,

    /// Value required for the inventory name tag.
    pub target_name: String,

    /// Required lifecycle state.
    pub target_state: String,

    /// Path of the script file to dispatch.
    pub script_path: PathBuf,

    /// Where the JSON report is written.
    pub report_path: PathBuf,

    /// Delay between status queries.
    pub poll_interval: Duration,

    /// Polling deadline.
    pub max_wait: Duration,

    /// Transient status query retries.
    pub status_retries: u32,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let target_name =
            lookup(ENV_TARGET_NAME).ok_or(ConfigError::MissingVar(ENV_TARGET_NAME))?;
        let script_path = lookup(ENV_SCRIPT).ok_or(ConfigError::MissingVar(ENV_SCRIPT))?;

        Ok(Self {
            agent_url: lookup(ENV_AGENT_URL).unwrap_or_else(|| DEFAULT_AGENT_URL.to_string()),
            target_name,
            target_state: lookup(ENV_TARGET_STATE)
                .unwrap_or_else(|| DEFAULT_TARGET_STATE.to_string()),
            script_path: PathBuf::from(script_path),
            report_path: PathBuf::from(
                lookup(ENV_REPORT_PATH).unwrap_or_else(|| DEFAULT_REPORT_PATH.to_string()),
            ),
            poll_interval: Duration::from_secs(parse_var(
                lookup(ENV_POLL_INTERVAL_SECS),
                ENV_POLL_INTERVAL_SECS,
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            max_wait: Duration::from_secs(parse_var(
                lookup(ENV_MAX_WAIT_SECS),
                ENV_MAX_WAIT_SECS,
                DEFAULT_MAX_WAIT_SECS,
            )?),
            status_retries: parse_var(
                lookup(ENV_STATUS_RETRIES),
                ENV_STATUS_RETRIES,
                DEFAULT_STATUS_RETRIES,
            )?,
        })
    }
}

fn parse_var<T: FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}
