//! XDG-style path utilities for configuration.
//!
//! Prefers XDG Base Directory Specification conventions over OS-specific
//! locations so the config file lives in the same place on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the configuration directory for tutor.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/tutor` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/tutor` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join("tutor")),
        _ => Ok(home_dir()?.join(".config").join("tutor")),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
