// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound-activity ingestion.
//!
//! The host message pipeline calls this on every observed message. It
//! lazily creates session state and profile, stamps activity timestamps,
//! and schedules the next idle deadline. This is the one place the idle
//! timer is armed outside the evaluator's repair path.

use std::sync::Arc;

use rekindle_config::RekindleConfig;
use rekindle_core::clock;
use rekindle_core::{ChatMessage, SessionId};
use rekindle_state::{ExchangeCache, ProfileStore, SessionStore};
use tracing::debug;

use crate::trigger;

/// Records inbound and outbound conversation activity into the stores.
#[derive(Clone)]
pub struct ActivityRecorder {
    config: Arc<RekindleConfig>,
    sessions: SessionStore,
    profiles: ProfileStore,
    exchanges: ExchangeCache,
}

impl ActivityRecorder {
    pub fn new(
        config: Arc<RekindleConfig>,
        sessions: SessionStore,
        profiles: ProfileStore,
        exchanges: ExchangeCache,
    ) -> Self {
        Self {
            config,
            sessions,
            profiles,
            exchanges,
        }
    }

    /// Record a message from the human participant.
    ///
    /// Resets the no-reply counter, subscribes the session when
    /// auto-subscribe is on, caches the message for prompt context, and
    /// arms the idle trigger.
    pub async fn record_user_message(&self, session: &SessionId, content: &str) {
        let now_ts = self.now_ts();
        let id = session.as_str();

        if self.config.scheduler.auto_subscribe {
            self.profiles.update(id, |p| p.subscribed = true).await;
        } else {
            // Ensure the profile exists so the session shows up for the
            // host command surface.
            self.profiles.update(id, |_| {}).await;
        }

        let profile = self.profiles.get(id).await.unwrap_or_default();
        let next_idle = self.next_idle_deadline(&profile, now_ts);

        self.sessions
            .update(id, |s| {
                s.last_activity_ts = now_ts;
                s.last_user_reply_ts = now_ts;
                s.consecutive_no_reply_count = 0;
                if let Some(deadline) = next_idle {
                    s.next_idle_deadline = deadline;
                }
            })
            .await;

        if profile.subscribed && !content.is_empty() {
            self.exchanges.push(id, ChatMessage::user(content)).await;
        }

        debug!(session = id, "user activity recorded");
    }

    /// Record a message the agent itself sent outside the scheduler (the
    /// host's normal reply pipeline). Does not touch `last_user_reply_ts`.
    pub async fn record_assistant_message(&self, session: &SessionId, content: &str) {
        let now_ts = self.now_ts();
        let id = session.as_str();

        let profile = self.profiles.get(id).await.unwrap_or_default();
        let next_idle = self.next_idle_deadline(&profile, now_ts);

        self.sessions
            .update(id, |s| {
                s.last_activity_ts = now_ts;
                if let Some(deadline) = next_idle {
                    s.next_idle_deadline = deadline;
                }
            })
            .await;

        if profile.subscribed && !content.is_empty() {
            self.exchanges
                .push(id, ChatMessage::assistant(content))
                .await;
        }
    }

    fn now_ts(&self) -> i64 {
        clock::now_in_zone(self.config.scheduler.timezone.as_deref()).timestamp()
    }

    fn next_idle_deadline(
        &self,
        profile: &rekindle_state::SubscriptionProfile,
        now_ts: i64,
    ) -> Option<i64> {
        if profile.subscribed && self.config.idle.enabled {
            let delay = trigger::idle_delay_minutes(profile, &self.config.idle);
            Some(now_ts + delay * 60)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn recorder(auto_subscribe: bool) -> (ActivityRecorder, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = RekindleConfig::default();
        config.scheduler.auto_subscribe = auto_subscribe;
        config.scheduler.timezone = Some("UTC".to_string());
        // Fixed override keeps the armed deadline deterministic.
        let config = Arc::new(config);

        let sessions = SessionStore::open(
            dir.path().join("sessions.json"),
            Duration::from_millis(10),
        )
        .await;
        let profiles = ProfileStore::open(
            dir.path().join("profiles.json"),
            Duration::from_millis(10),
        )
        .await;
        let exchanges = ExchangeCache::open(
            dir.path().join("history.json"),
            Duration::from_millis(10),
            8,
        )
        .await;

        (
            ActivityRecorder::new(config, sessions, profiles, exchanges),
            dir,
        )
    }

    #[tokio::test]
    async fn user_message_stamps_and_resets_counter() {
        let (recorder, _dir) = recorder(false).await;
        let session = SessionId::from("s1");

        recorder
            .sessions
            .update("s1", |s| s.consecutive_no_reply_count = 3)
            .await;
        recorder.record_user_message(&session, "hi").await;

        let state = recorder.sessions.get("s1").await.unwrap();
        assert!(state.last_activity_ts > 0);
        assert_eq!(state.last_user_reply_ts, state.last_activity_ts);
        assert_eq!(state.consecutive_no_reply_count, 0);
    }

    #[tokio::test]
    async fn unsubscribed_session_gets_no_idle_deadline() {
        let (recorder, _dir) = recorder(false).await;
        recorder
            .record_user_message(&SessionId::from("s1"), "hi")
            .await;
        let state = recorder.sessions.get("s1").await.unwrap();
        assert_eq!(state.next_idle_deadline, 0);
        // Profile was still created for the command surface.
        assert!(recorder.profiles.get("s1").await.is_some());
    }

    #[tokio::test]
    async fn auto_subscribe_arms_idle_deadline() {
        let (recorder, _dir) = recorder(true).await;
        recorder
            .profiles
            .update("s1", |p| p.idle_after_minutes = Some(45))
            .await;
        recorder
            .record_user_message(&SessionId::from("s1"), "hi")
            .await;

        let state = recorder.sessions.get("s1").await.unwrap();
        assert!(recorder.profiles.get("s1").await.unwrap().subscribed);
        assert_eq!(state.next_idle_deadline, state.last_activity_ts + 45 * 60);
    }

    #[tokio::test]
    async fn subscribed_session_caches_exchange() {
        let (recorder, _dir) = recorder(true).await;
        let session = SessionId::from("s1");
        recorder.record_user_message(&session, "good evening").await;
        recorder
            .record_assistant_message(&session, "good evening to you")
            .await;

        let cached = recorder.exchanges.recent("s1").await;
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].role, "user");
        assert_eq!(cached[1].role, "assistant");
    }

    #[tokio::test]
    async fn assistant_message_does_not_touch_user_reply_ts() {
        let (recorder, _dir) = recorder(true).await;
        let session = SessionId::from("s1");
        recorder.record_user_message(&session, "hi").await;
        let user_ts = recorder.sessions.get("s1").await.unwrap().last_user_reply_ts;

        recorder.record_assistant_message(&session, "reply").await;
        let state = recorder.sessions.get("s1").await.unwrap();
        assert_eq!(state.last_user_reply_ts, user_ts);
    }
}
