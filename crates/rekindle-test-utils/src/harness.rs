// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete proactive engine over a temp data
//! directory with mock provider and transport: stores, activity recorder,
//! dispatcher, and scheduler. Tests mutate stores directly to set up
//! trigger conditions and drive `scheduler.tick_once()`.

use std::sync::Arc;
use std::time::Duration;

use rekindle_config::RekindleConfig;
use rekindle_core::{FixedProvider, HistoryChain, StaticPersona};
use rekindle_scheduler::{ActivityRecorder, Dispatcher, Scheduler};
use rekindle_state::{ExchangeCache, ProfileStore, ReminderStore, SessionStore};

use crate::mock_provider::MockReplyProvider;
use crate::mock_transport::MockTransport;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    system_prompt: String,
    configure: Option<Box<dyn FnOnce(&mut RekindleConfig) + Send>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            system_prompt: "You are a test companion.".to_string(),
            configure: None,
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set the persona system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Adjust the config before the engine is assembled.
    pub fn with_config(mut self, configure: impl FnOnce(&mut RekindleConfig) + Send + 'static) -> Self {
        self.configure = Some(Box::new(configure));
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> TestHarness {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");

        let mut config = RekindleConfig::default();
        config.scheduler.timezone = Some("UTC".to_string());
        config.scheduler.reply_interval_secs = 0;
        config.storage.data_dir = temp_dir.path().to_string_lossy().to_string();
        config.storage.debounce_ms = 50;
        if let Some(configure) = self.configure {
            configure(&mut config);
        }
        let config = Arc::new(config);

        let debounce = Duration::from_millis(config.storage.debounce_ms);
        let data_dir = temp_dir.path();
        let sessions = SessionStore::open(data_dir.join("sessions.json"), debounce).await;
        let profiles = ProfileStore::open(data_dir.join("profiles.json"), debounce).await;
        let reminders = ReminderStore::open(data_dir.join("reminders.json"), debounce).await;
        let exchanges = ExchangeCache::open(
            data_dir.join("history.json"),
            debounce,
            config.storage.exchange_cache_len,
        )
        .await;

        let provider = Arc::new(if self.responses.is_empty() {
            MockReplyProvider::new()
        } else {
            MockReplyProvider::with_responses(self.responses)
        });
        let transport = Arc::new(MockTransport::new());

        let dispatcher = Dispatcher::from_config(
            &config,
            Arc::new(FixedProvider::new(provider.clone())),
            transport.clone(),
            HistoryChain::new(vec![Arc::new(exchanges.clone())]),
            Arc::new(StaticPersona(self.system_prompt)),
            sessions.clone(),
            exchanges.clone(),
        );

        let recorder = ActivityRecorder::new(
            config.clone(),
            sessions.clone(),
            profiles.clone(),
            exchanges.clone(),
        );

        let scheduler = Scheduler::new(
            config.clone(),
            sessions.clone(),
            profiles.clone(),
            reminders.clone(),
            exchanges.clone(),
            dispatcher,
        );

        TestHarness {
            provider,
            transport,
            sessions,
            profiles,
            reminders,
            exchanges,
            recorder,
            scheduler,
            config,
            _temp_dir: temp_dir,
        }
    }
}

/// A complete test environment with mock capabilities and temp storage.
pub struct TestHarness {
    /// The mock reply provider.
    pub provider: Arc<MockReplyProvider>,
    /// The mock transport capturing outbound messages.
    pub transport: Arc<MockTransport>,
    pub sessions: SessionStore,
    pub profiles: ProfileStore,
    pub reminders: ReminderStore,
    pub exchanges: ExchangeCache,
    /// Inbound-activity hook, as the host pipeline would call it.
    pub recorder: ActivityRecorder,
    /// The engine under test; drive it with `tick_once()`.
    pub scheduler: Scheduler,
    pub config: Arc<RekindleConfig>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Subscribe a session and give it prior activity `secs_ago` seconds
    /// in the past with an already-due idle deadline.
    pub async fn subscribe_idle_due(&self, session_id: &str, secs_ago: i64) {
        let now_ts = rekindle_core::clock::now_in_zone(Some("UTC")).timestamp();
        self.profiles.set_subscribed(session_id, true).await;
        self.sessions
            .update(session_id, |s| {
                s.last_activity_ts = now_ts - secs_ago;
                s.last_user_reply_ts = now_ts - secs_ago;
                s.next_idle_deadline = now_ts - 1;
            })
            .await;
    }
}
