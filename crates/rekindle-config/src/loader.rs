// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rekindle.toml` > `~/.config/rekindle/rekindle.toml`
//! > `/etc/rekindle/rekindle.toml` with environment variable overrides via
//! `REKINDLE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RekindleConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rekindle/rekindle.toml` (system-wide)
/// 3. `~/.config/rekindle/rekindle.toml` (user XDG config)
/// 4. `./rekindle.toml` (local directory)
/// 5. `REKINDLE_*` environment variables
pub fn load_config() -> Result<RekindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RekindleConfig::default()))
        .merge(Toml::file("/etc/rekindle/rekindle.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rekindle/rekindle.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rekindle.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RekindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RekindleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RekindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RekindleConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `REKINDLE_SCHEDULER_QUIET_HOURS` must
/// map to `scheduler.quiet_hours`, not `scheduler.quiet.hours`.
fn env_provider() -> Env {
    Env::prefixed("REKINDLE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: REKINDLE_SCHEDULER_QUIET_HOURS -> "scheduler_quiet_hours"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("scheduler_", "scheduler.", 1)
            .replacen("idle_", "idle.", 1)
            .replacen("daily_", "daily.", 1)
            .replacen("reminders_", "reminders.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("anthropic_", "anthropic.", 1);
        mapped.into()
    })
}
