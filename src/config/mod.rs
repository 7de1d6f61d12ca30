//! Configuration loading
//!
//! Values come from a config file next to the working copy (or one given with
//! `--config`), falling back to built-in defaults. Command-line arguments are
//! applied on top by the caller.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::git::runner::DEFAULT_TIMEOUT;
use crate::url::DEFAULT_HOST_PATH;

pub mod loader;

pub use loader::load_config;

/// Largest accepted `timeout_secs`: one day.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix the repository name is appended to.
    pub host_path: String,
    /// Name of the remote to create or repoint.
    pub remote_name: String,
    /// Git executable to invoke.
    pub git_binary: String,
    /// Per-command time limit, in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_path: DEFAULT_HOST_PATH.to_string(),
            remote_name: "origin".to_string(),
            git_binary: "git".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            bail!("timeout_secs must be at most {MAX_TIMEOUT_SECS}, got {}", self.timeout_secs);
        }
        if self.remote_name.trim().is_empty() {
            bail!("remote_name must not be empty");
        }
        if self.git_binary.trim().is_empty() {
            bail!("git_binary must not be empty");
        }
        Ok(())
    }
}
