// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading and validation.

use rekindle_config::{load_and_validate_str, ConfigError};

#[test]
fn full_config_round_trip() {
    let config = load_and_validate_str(
        r#"
[agent]
name = "nightowl"
log_level = "debug"
system_prompt = "You are a night owl companion."

[scheduler]
tick_interval_secs = 30
reply_interval_secs = 5
timezone = "Asia/Shanghai"
quiet_hours = "23:30-07:30"
history_depth = 12
max_no_reply_days = 3
auto_subscribe = true
append_timestamp = true

[idle]
after_minutes = 50
fluctuation_minutes = 10
prompts = ["Say hi to the user.", "Check in casually."]

[daily]
enabled = true

[[daily.slots]]
time = "08:30"
prompt = "Wish the user a good morning."

[[daily.slots]]
time = "21:30"
prompt = "Wind down with the user."

[reminders]
enabled = true

[storage]
data_dir = "/tmp/rekindle-test"
debounce_ms = 500
"#,
    )
    .expect("config should load and validate");

    assert_eq!(config.agent.name, "nightowl");
    assert_eq!(config.scheduler.timezone.as_deref(), Some("Asia/Shanghai"));
    assert_eq!(config.scheduler.max_no_reply_days, 3);
    assert!(config.scheduler.auto_subscribe);
    assert_eq!(config.idle.prompts.len(), 2);
    assert_eq!(config.daily.slots.len(), 2);
    assert_eq!(config.storage.debounce_ms, 500);
}

#[test]
fn empty_config_uses_defaults_and_validates() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.agent.name, "rekindle");
    assert_eq!(config.scheduler.tick_interval_secs, 30);
}

#[test]
fn typo_in_key_produces_suggestion() {
    let errors = load_and_validate_str(
        r#"
[idle]
after_minuts = 45
"#,
    )
    .unwrap_err();

    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion, .. }
            if suggestion.as_deref() == Some("after_minutes")
    )));
}

#[test]
fn semantic_errors_reported_as_validation() {
    let errors = load_and_validate_str(
        r#"
[scheduler]
tick_interval_secs = 300
"#,
    )
    .unwrap_err();

    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { .. })));
}
