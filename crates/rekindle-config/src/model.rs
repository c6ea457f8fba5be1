// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Rekindle proactive agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Rekindle configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RekindleConfig {
    /// Agent identity and persona settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Scheduler loop and suppression settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Idle-greeting trigger settings.
    #[serde(default)]
    pub idle: IdleConfig,

    /// Daily-slot trigger settings.
    #[serde(default)]
    pub daily: DailyConfig,

    /// Reminder trigger settings.
    #[serde(default)]
    pub reminders: RemindersConfig,

    /// State persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Anthropic API settings for the built-in reply provider.
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

/// Agent identity and persona configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system prompt string. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the system prompt.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "rekindle".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scheduler loop configuration.
///
/// `tick_interval_secs` bounds trigger precision: daily slots match a
/// wall-clock minute, so an interval above 60 seconds can skip a slot
/// entirely. Validation rejects such intervals.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Master switch; when false the loop ticks but evaluates nothing.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between evaluation passes.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Cooldown sleep after each successful proactive send, throttling
    /// back-to-back sends within one tick. 0 disables the cooldown.
    #[serde(default = "default_reply_interval")]
    pub reply_interval_secs: u64,

    /// IANA timezone name for all wall-clock matching. `None` uses local time.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Global quiet window "HH:MM-HH:MM"; per-session profiles may override.
    #[serde(default)]
    pub quiet_hours: Option<String>,

    /// Number of recent history entries handed to the reply provider.
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Auto-unsubscribe a session after this many days without a user
    /// reply. 0 disables auto-unsubscribe.
    #[serde(default)]
    pub max_no_reply_days: u32,

    /// Automatically subscribe sessions on inbound user activity
    /// (and re-subscribe previously auto-unsubscribed ones).
    #[serde(default)]
    pub auto_subscribe: bool,

    /// Prefix sent messages with a formatted timestamp.
    #[serde(default)]
    pub append_timestamp: bool,

    /// strftime pattern for `{now}` and the timestamp prefix.
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_secs: default_tick_interval(),
            reply_interval_secs: default_reply_interval(),
            timezone: None,
            quiet_hours: None,
            history_depth: default_history_depth(),
            max_no_reply_days: 0,
            auto_subscribe: false,
            append_timestamp: false,
            time_format: default_time_format(),
        }
    }
}

fn default_tick_interval() -> u64 {
    30
}

fn default_reply_interval() -> u64 {
    10
}

fn default_history_depth() -> usize {
    8
}

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_true() -> bool {
    true
}

/// Idle-greeting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base idle delay in minutes before a proactive greeting.
    #[serde(default = "default_idle_after")]
    pub after_minutes: u32,

    /// Uniform random fluctuation (± minutes) applied to the base delay
    /// so greetings are not mechanically regular.
    #[serde(default = "default_idle_fluctuation")]
    pub fluctuation_minutes: u32,

    /// Prompt templates; one is picked at random per greeting. With no
    /// templates the dispatcher's default continuation prompt is used.
    #[serde(default)]
    pub prompts: Vec<String>,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            after_minutes: default_idle_after(),
            fluctuation_minutes: default_idle_fluctuation(),
            prompts: Vec::new(),
        }
    }
}

fn default_idle_after() -> u32 {
    45
}

fn default_idle_fluctuation() -> u32 {
    15
}

/// Daily-slot configuration: up to three fixed wall-clock send times.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DailyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Configured slots; validation caps these at three.
    #[serde(default)]
    pub slots: Vec<DailySlotConfig>,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slots: Vec::new(),
        }
    }
}

/// A single daily slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DailySlotConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Wall-clock time "HH:MM" in the scheduler timezone.
    pub time: String,

    /// Prompt template rendered for this slot.
    pub prompt: String,
}

/// Reminder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemindersConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Template for reminder prompts; `{reminder_content}` carries the
    /// reminder text.
    #[serde(default = "default_reminder_template")]
    pub prompt_template: String,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prompt_template: default_reminder_template(),
        }
    }
}

fn default_reminder_template() -> String {
    "The user asked to be reminded about: {reminder_content}. \
     Write a short, friendly reminder message."
        .to_string()
}

/// State persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding sessions.json, profiles.json, reminders.json,
    /// and history.json.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Debounce window for coalescing state writes, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum entries kept per session in the recent-exchange cache.
    #[serde(default = "default_exchange_cache_len")]
    pub exchange_cache_len: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            debounce_ms: default_debounce_ms(),
            exchange_cache_len: default_exchange_cache_len(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("rekindle"))
        .unwrap_or_else(|| std::path::PathBuf::from("./rekindle-data"))
        .to_string_lossy()
        .to_string()
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_exchange_cache_len() -> usize {
    32
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the ANTHROPIC_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for proactive replies.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}
