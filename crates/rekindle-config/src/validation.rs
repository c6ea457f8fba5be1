// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: time string formats, tick-interval bounds, slot limits.
//! Runtime evaluation still degrades gracefully on malformed time strings;
//! this pass exists to surface mistakes at startup instead of silently
//! disabling features.

use rekindle_core::clock::parse_hhmm;

use crate::diagnostic::ConfigError;
use crate::model::RekindleConfig;

/// Daily slots beyond this count are a configuration error.
const MAX_DAILY_SLOTS: usize = 3;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &RekindleConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Daily-slot matching is minute-granular: a tick longer than a minute
    // can skip a slot entirely.
    if config.scheduler.tick_interval_secs == 0 || config.scheduler.tick_interval_secs > 60 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.tick_interval_secs must be in 1..=60, got {}",
                config.scheduler.tick_interval_secs
            ),
        });
    }

    if let Some(quiet) = &config.scheduler.quiet_hours {
        if !is_valid_window(quiet) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "scheduler.quiet_hours `{quiet}` is not a valid HH:MM-HH:MM window"
                ),
            });
        }
    }

    if config.idle.after_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "idle.after_minutes must be at least 1".to_string(),
        });
    }

    if config.daily.slots.len() > MAX_DAILY_SLOTS {
        errors.push(ConfigError::Validation {
            message: format!(
                "daily.slots supports at most {MAX_DAILY_SLOTS} slots, got {}",
                config.daily.slots.len()
            ),
        });
    }

    for (i, slot) in config.daily.slots.iter().enumerate() {
        if slot.enabled && parse_hhmm(&slot.time).is_none() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "daily.slots[{i}].time `{}` is not a valid HH:MM time",
                    slot.time
                ),
            });
        }
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.storage.exchange_cache_len == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.exchange_cache_len must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether a string is a well-formed `HH:MM-HH:MM` window.
fn is_valid_window(window: &str) -> bool {
    match window.split_once('-') {
        Some((a, b)) => parse_hhmm(a).is_some() && parse_hhmm(b).is_some(),
        None => false,
    }
}
