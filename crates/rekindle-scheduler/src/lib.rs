// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proactive scheduling engine for the Rekindle agent.
//!
//! The [`Scheduler`] wakes on a fixed interval and, for every subscribed
//! session, runs the auto-unsubscribe check, the quiet-hours check, the
//! idle trigger, and the daily-slot triggers, then evaluates all
//! reminders once. Firing triggers are handed to the
//! [`Dispatcher`](dispatch::Dispatcher), which generates a reply through
//! the provider capability and delivers it through the transport.
//!
//! Ticks never overlap: one tick runs to completion before the next
//! sleep. A failure in one session never aborts the tick for the others,
//! and nothing short of cancellation stops the loop.

pub mod activity;
pub mod dispatch;
pub mod trigger;

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rekindle_config::RekindleConfig;
use rekindle_core::clock;
use rekindle_core::{RekindleError, SessionId};
use rekindle_state::{ExchangeCache, ProfileStore, ReminderStore, SessionStore, SubscriptionProfile};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub use activity::ActivityRecorder;
pub use dispatch::{Dispatcher, DispatchOptions, DEFAULT_CONTINUATION_PROMPT};

/// The periodic driver for proactive triggers.
pub struct Scheduler {
    config: Arc<RekindleConfig>,
    sessions: SessionStore,
    profiles: ProfileStore,
    reminders: ReminderStore,
    exchanges: ExchangeCache,
    dispatcher: Dispatcher,
}

impl Scheduler {
    pub fn new(
        config: Arc<RekindleConfig>,
        sessions: SessionStore,
        profiles: ProfileStore,
        reminders: ReminderStore,
        exchanges: ExchangeCache,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            config,
            sessions,
            profiles,
            reminders,
            exchanges,
            dispatcher,
        }
    }

    /// Run the tick loop until the cancellation token triggers.
    ///
    /// Cancellation aborts the sleep, never a tick in progress. On the
    /// way out every store is flushed unconditionally, so shutdown never
    /// loses debounced state.
    pub async fn run(&self, cancel: CancellationToken) {
        let interval_secs = self.config.scheduler.tick_interval_secs.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // A slow tick skips catch-up bursts instead of firing back-to-back.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Consume the immediate first tick so the loop starts with a sleep.
        ticker.tick().await;

        info!(interval_secs, "scheduler running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_once().await;
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping scheduler");
                    break;
                }
            }
        }

        self.flush_all().await;
        info!("scheduler stopped");
    }

    /// Run a single evaluation pass over all subscribed sessions and
    /// reminders. Public so a host can drive the engine on its own clock.
    pub async fn tick_once(&self) {
        if !self.config.scheduler.enabled {
            debug!("scheduler disabled, skipping tick");
            return;
        }

        let now = clock::now_in_zone(self.config.scheduler.timezone.as_deref());
        let slots = trigger::resolve_daily_slots(&self.config.daily);
        let subscribed = self.profiles.subscribed_sessions().await;

        debug!(
            now = %now.format("%Y-%m-%d %H:%M"),
            sessions = subscribed.len(),
            "tick"
        );

        for (session_id, profile) in subscribed {
            if let Err(e) = self
                .evaluate_session(&session_id, &profile, &now, &slots)
                .await
            {
                error!(
                    session = session_id.as_str(),
                    error = %e,
                    "session evaluation failed, continuing with remaining sessions"
                );
            }
        }

        self.evaluate_reminders(&now).await;
    }

    /// Evaluate one session's triggers. Errors are contained by the
    /// caller so one session cannot poison the tick.
    async fn evaluate_session(
        &self,
        session_id: &str,
        profile: &SubscriptionProfile,
        now: &chrono::DateTime<chrono::FixedOffset>,
        slots: &[trigger::ResolvedSlot],
    ) -> Result<(), RekindleError> {
        let now_ts = now.timestamp();
        let state = self.sessions.get(session_id).await.unwrap_or_default();

        if trigger::should_auto_unsubscribe(
            &state,
            self.config.scheduler.max_no_reply_days,
            now_ts,
        ) {
            self.profiles.set_subscribed(session_id, false).await;
            info!(
                session = session_id,
                "auto-unsubscribed after prolonged user silence"
            );
            return Ok(());
        }

        // Quiet hours skip without marking tags: pending triggers fire on
        // the first tick after the window closes.
        if self.in_effective_quiet_window(profile, now) {
            debug!(session = session_id, "inside quiet hours, skipping");
            return Ok(());
        }

        let session = SessionId::from(session_id);

        match trigger::evaluate_idle(&state, profile, &self.config.idle, now) {
            trigger::IdleDecision::Fire { tag } => {
                let template = pick_idle_prompt(&self.config.idle.prompts);
                info!(session = session_id, "idle trigger fired");
                let sent = self
                    .dispatcher
                    .dispatch(&session, template.as_deref(), None)
                    .await;
                if sent {
                    self.sessions
                        .update(session_id, |s| {
                            s.mark_fired(&tag, now_ts);
                            s.next_idle_deadline = 0;
                        })
                        .await;
                    self.cooldown().await;
                } else {
                    self.sessions
                        .update(session_id, |s| s.consecutive_no_reply_count += 1)
                        .await;
                }
            }
            trigger::IdleDecision::Reschedule { deadline } => {
                self.sessions
                    .update(session_id, |s| {
                        // Another writer may have armed it meanwhile.
                        if s.next_idle_deadline == 0 {
                            s.next_idle_deadline = deadline;
                        }
                    })
                    .await;
                debug!(session = session_id, deadline, "idle deadline repaired");
            }
            trigger::IdleDecision::NotDue | trigger::IdleDecision::AlreadyFired => {}
        }

        if self.config.daily.enabled && profile.daily_reminders_enabled {
            // Re-read: the idle branch may have just mutated this session.
            let state = self.sessions.get(session_id).await.unwrap_or_default();
            if let Some((tag, slot)) = trigger::evaluate_daily(&state, slots, now) {
                info!(session = session_id, slot = slot.index + 1, "daily trigger fired");
                let sent = self
                    .dispatcher
                    .dispatch(&session, Some(&slot.prompt), None)
                    .await;
                if sent {
                    self.sessions
                        .update(session_id, |s| s.mark_fired(&tag, now_ts))
                        .await;
                    self.cooldown().await;
                } else {
                    self.sessions
                        .update(session_id, |s| s.consecutive_no_reply_count += 1)
                        .await;
                }
            }
        }

        Ok(())
    }

    /// Evaluate every reminder once per tick, independently of the
    /// per-session loop.
    async fn evaluate_reminders(&self, now: &chrono::DateTime<chrono::FixedOffset>) {
        if !self.config.reminders.enabled {
            return;
        }
        let now_ts = now.timestamp();
        let mut spent_one_shots = Vec::new();

        for (id, reminder) in self.reminders.snapshot().await {
            let Some(fire) = trigger::reminder_due(&reminder, now) else {
                continue;
            };

            // Quiet hours preserve the reminder: nothing is marked or
            // deleted, so it fires once the window closes.
            let profile = self
                .profiles
                .get(&reminder.session_id)
                .await
                .unwrap_or_default();
            if self.in_effective_quiet_window(&profile, now) {
                debug!(reminder = id.as_str(), "reminder due inside quiet hours, deferred");
                continue;
            }

            let state = self
                .sessions
                .get(&reminder.session_id)
                .await
                .unwrap_or_default();
            if state.has_fired(&fire.tag) {
                continue;
            }

            info!(
                reminder = id.as_str(),
                session = reminder.session_id.as_str(),
                "reminder trigger fired"
            );

            let session = SessionId::from(reminder.session_id.as_str());
            let sent = self
                .dispatcher
                .dispatch(
                    &session,
                    Some(&self.config.reminders.prompt_template),
                    Some(&reminder.content),
                )
                .await;

            if sent {
                self.sessions
                    .update(&reminder.session_id, |s| s.mark_fired(&fire.tag, now_ts))
                    .await;
            }
            if fire.one_shot {
                // At-most-one-attempt: a permanently failing provider must
                // not cause a retry storm.
                spent_one_shots.push(id);
            }
            if sent {
                self.cooldown().await;
            }
        }

        for id in spent_one_shots {
            self.reminders.remove(&id).await;
        }
    }

    fn in_effective_quiet_window(
        &self,
        profile: &SubscriptionProfile,
        now: &chrono::DateTime<chrono::FixedOffset>,
    ) -> bool {
        let window = profile
            .quiet_hours
            .as_deref()
            .or(self.config.scheduler.quiet_hours.as_deref());
        match window {
            Some(window) => clock::in_quiet_window(now.time(), window),
            None => false,
        }
    }

    /// Cooldown sleep after a successful dispatch, rate-limiting
    /// back-to-back proactive sends within one tick.
    async fn cooldown(&self) {
        let secs = self.config.scheduler.reply_interval_secs;
        if secs > 0 {
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
    }

    /// Flush every store unconditionally, cancelling pending debounced
    /// writes.
    pub async fn flush_all(&self) {
        self.sessions.flush_now().await;
        self.profiles.flush_now().await;
        self.reminders.flush_now().await;
        self.exchanges.flush_now().await;
    }
}

/// Pick a random idle prompt template; `None` when no templates are
/// configured.
fn pick_idle_prompt(prompts: &[String]) -> Option<String> {
    prompts.choose(&mut rand::thread_rng()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rekindle_core::{
        FixedProvider, HistoryChain, MessageId, OutboundMessage, ReplyProvider, ReplyRequest,
        StaticPersona, Transport,
    };
    use rekindle_state::ReminderSchedule;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    struct EchoProvider;

    #[async_trait]
    impl ReplyProvider for EchoProvider {
        async fn generate(&self, request: ReplyRequest) -> Result<String, RekindleError> {
            Ok(format!("reply to: {}", request.prompt))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ReplyProvider for FailingProvider {
        async fn generate(&self, _request: ReplyRequest) -> Result<String, RekindleError> {
            Err(RekindleError::Provider {
                message: "permanently down".into(),
                source: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: StdMutex<Vec<OutboundMessage>>,
        fail: AtomicBool,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RekindleError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RekindleError::Channel {
                    message: "refused".into(),
                    source: None,
                });
            }
            self.sent.lock().unwrap().push(msg);
            Ok(MessageId("m".into()))
        }
    }

    struct Fixture {
        scheduler: Scheduler,
        sessions: SessionStore,
        profiles: ProfileStore,
        reminders: ReminderStore,
        transport: Arc<RecordingTransport>,
        _dir: tempfile::TempDir,
    }

    async fn fixture(
        mutate_config: impl FnOnce(&mut RekindleConfig),
        provider: Arc<dyn ReplyProvider>,
    ) -> Fixture {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = RekindleConfig::default();
        config.scheduler.timezone = Some("UTC".to_string());
        config.scheduler.reply_interval_secs = 0;
        mutate_config(&mut config);
        let config = Arc::new(config);

        let debounce = Duration::from_millis(10);
        let sessions =
            SessionStore::open(dir.path().join("sessions.json"), debounce).await;
        let profiles =
            ProfileStore::open(dir.path().join("profiles.json"), debounce).await;
        let reminders =
            ReminderStore::open(dir.path().join("reminders.json"), debounce).await;
        let exchanges =
            ExchangeCache::open(dir.path().join("history.json"), debounce, 8).await;

        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::from_config(
            &config,
            Arc::new(FixedProvider::new(provider)),
            transport.clone(),
            HistoryChain::new(vec![Arc::new(exchanges.clone())]),
            Arc::new(StaticPersona("test persona".into())),
            sessions.clone(),
            exchanges.clone(),
        );

        let scheduler = Scheduler::new(
            config,
            sessions.clone(),
            profiles.clone(),
            reminders.clone(),
            exchanges,
            dispatcher,
        );

        Fixture {
            scheduler,
            sessions,
            profiles,
            reminders,
            transport,
            _dir: dir,
        }
    }

    fn now_ts() -> i64 {
        clock::now_in_zone(Some("UTC")).timestamp()
    }

    async fn subscribe_with_due_idle(fx: &Fixture, id: &str) {
        fx.profiles.set_subscribed(id, true).await;
        let ts = now_ts();
        fx.sessions
            .update(id, |s| {
                s.last_activity_ts = ts - 3600;
                s.last_user_reply_ts = ts - 3600;
                s.next_idle_deadline = ts - 60;
            })
            .await;
    }

    #[tokio::test]
    async fn idle_fires_once_then_dedups_within_minute() {
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        subscribe_with_due_idle(&fx, "s1").await;

        fx.scheduler.tick_once().await;
        fx.scheduler.tick_once().await;

        assert_eq!(fx.transport.sent().len(), 1, "second tick must dedup");
        let state = fx.sessions.get("s1").await.unwrap();
        assert_eq!(state.next_idle_deadline, 0, "deadline cleared after fire");
        assert!(state
            .fired_tags
            .keys()
            .any(|tag| tag.starts_with("idle@")));
    }

    #[tokio::test]
    async fn disabled_scheduler_is_a_no_op() {
        let fx = fixture(|c| c.scheduler.enabled = false, Arc::new(EchoProvider)).await;
        subscribe_with_due_idle(&fx, "s1").await;

        fx.scheduler.tick_once().await;
        assert!(fx.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn unsubscribed_sessions_are_not_evaluated() {
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        let ts = now_ts();
        fx.sessions
            .update("s1", |s| {
                s.last_activity_ts = ts - 3600;
                s.next_idle_deadline = ts - 60;
            })
            .await;

        fx.scheduler.tick_once().await;
        assert!(fx.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn quiet_hours_preserve_pending_idle_trigger() {
        let fx = fixture(
            |c| c.scheduler.quiet_hours = Some("00:00-23:59".to_string()),
            Arc::new(EchoProvider),
        )
        .await;
        subscribe_with_due_idle(&fx, "s1").await;
        let deadline_before = fx.sessions.get("s1").await.unwrap().next_idle_deadline;

        fx.scheduler.tick_once().await;

        assert!(fx.transport.sent().is_empty());
        let state = fx.sessions.get("s1").await.unwrap();
        assert_eq!(state.next_idle_deadline, deadline_before, "trigger preserved");
        assert!(state.fired_tags.is_empty(), "no tag marked during quiet hours");
    }

    #[tokio::test]
    async fn profile_quiet_hours_override_global() {
        // Global window is open, but the profile's own window covers now.
        let fx = fixture(
            |c| c.scheduler.quiet_hours = None,
            Arc::new(EchoProvider),
        )
        .await;
        subscribe_with_due_idle(&fx, "s1").await;
        fx.profiles
            .update("s1", |p| p.quiet_hours = Some("00:00-23:59".to_string()))
            .await;

        fx.scheduler.tick_once().await;
        assert!(fx.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_dispatch_increments_no_reply_counter() {
        let fx = fixture(|_| {}, Arc::new(FailingProvider)).await;
        subscribe_with_due_idle(&fx, "s1").await;

        fx.scheduler.tick_once().await;

        let state = fx.sessions.get("s1").await.unwrap();
        assert_eq!(state.consecutive_no_reply_count, 1);
        assert!(state.fired_tags.is_empty(), "failure records no tag");
        assert!(state.next_idle_deadline > 0, "deadline kept for retry");
    }

    #[tokio::test]
    async fn auto_unsubscribe_suppresses_all_triggers_same_tick() {
        let fx = fixture(|c| c.scheduler.max_no_reply_days = 3, Arc::new(EchoProvider)).await;
        fx.profiles.set_subscribed("s1", true).await;
        let ts = now_ts();
        fx.sessions
            .update("s1", |s| {
                s.last_activity_ts = ts - 4 * 86_400;
                s.last_user_reply_ts = ts - 4 * 86_400;
                s.next_idle_deadline = ts - 60;
            })
            .await;

        fx.scheduler.tick_once().await;

        assert!(!fx.profiles.get("s1").await.unwrap().subscribed);
        assert!(fx.transport.sent().is_empty(), "no trigger fires in the same tick");
    }

    #[tokio::test]
    async fn failure_in_one_session_does_not_block_others() {
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        subscribe_with_due_idle(&fx, "healthy").await;

        // A subscribed session with no state at all exercises the default
        // path; nothing fires for it, and `healthy` still dispatches.
        fx.profiles.set_subscribed("empty", true).await;

        fx.scheduler.tick_once().await;
        let sent = fx.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].session_id.as_str(), "healthy");
    }

    #[tokio::test]
    async fn one_shot_reminder_removed_after_failed_attempt() {
        let fx = fixture(|_| {}, Arc::new(FailingProvider)).await;
        let past = "2020-01-01 00:00";
        fx.reminders
            .add(
                "s1",
                "pay rent",
                ReminderSchedule::parse(past).unwrap(),
                now_ts(),
            )
            .await;

        fx.scheduler.tick_once().await;

        assert_eq!(fx.reminders.len().await, 0, "one attempt only, then removed");
        assert!(fx.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn one_shot_reminder_fires_once_and_is_removed() {
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        fx.reminders
            .add(
                "s1",
                "pay rent",
                ReminderSchedule::parse("2020-01-01 00:00").unwrap(),
                now_ts(),
            )
            .await;

        fx.scheduler.tick_once().await;
        fx.scheduler.tick_once().await;

        let sent = fx.transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].content.starts_with("⏰ "));
        assert_eq!(fx.reminders.len().await, 0);
    }

    #[tokio::test]
    async fn recurring_reminder_dedups_within_day() {
        let now = clock::now_in_zone(Some("UTC"));
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        fx.reminders
            .add(
                "s1",
                "drink water",
                ReminderSchedule::Daily {
                    hour: chrono::Timelike::hour(&now),
                    minute: chrono::Timelike::minute(&now),
                },
                now_ts(),
            )
            .await;

        fx.scheduler.tick_once().await;
        fx.scheduler.tick_once().await;

        assert_eq!(fx.transport.sent().len(), 1, "one fire per day");
        assert_eq!(fx.reminders.len().await, 1, "recurring reminder persists");
    }

    #[tokio::test]
    async fn reminders_fire_for_unsubscribed_sessions() {
        let fx = fixture(|_| {}, Arc::new(EchoProvider)).await;
        fx.profiles.set_subscribed("s1", false).await;
        fx.reminders
            .add(
                "s1",
                "call home",
                ReminderSchedule::parse("2020-01-01 00:00").unwrap(),
                now_ts(),
            )
            .await;

        fx.scheduler.tick_once().await;
        assert_eq!(fx.transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn reminder_deferred_by_quiet_hours_is_preserved() {
        let fx = fixture(
            |c| c.scheduler.quiet_hours = Some("00:00-23:59".to_string()),
            Arc::new(EchoProvider),
        )
        .await;
        fx.reminders
            .add(
                "s1",
                "call home",
                ReminderSchedule::parse("2020-01-01 00:00").unwrap(),
                now_ts(),
            )
            .await;

        fx.scheduler.tick_once().await;
        assert!(fx.transport.sent().is_empty());
        assert_eq!(fx.reminders.len().await, 1, "not consumed during quiet hours");
    }

    #[tokio::test]
    async fn daily_slot_fires_for_current_minute_once() {
        let now = clock::now_in_zone(Some("UTC"));
        let hhmm = now.format("%H:%M").to_string();
        let fx = fixture(
            move |c| {
                c.daily.slots = vec![rekindle_config::model::DailySlotConfig {
                    enabled: true,
                    time: hhmm,
                    prompt: "daily greeting".to_string(),
                }];
            },
            Arc::new(EchoProvider),
        )
        .await;
        fx.profiles.set_subscribed("s1", true).await;
        let ts = now_ts();
        fx.sessions
            .update("s1", |s| {
                s.last_activity_ts = ts - 60;
                s.last_user_reply_ts = ts - 60;
                s.next_idle_deadline = ts + 3600;
            })
            .await;

        fx.scheduler.tick_once().await;
        fx.scheduler.tick_once().await;

        assert_eq!(fx.transport.sent().len(), 1, "per-day tag dedups");
        let state = fx.sessions.get("s1").await.unwrap();
        assert!(state.fired_tags.keys().any(|t| t.starts_with("daily1@")));
    }

    #[tokio::test]
    async fn daily_disabled_on_profile_suppresses_slot() {
        let now = clock::now_in_zone(Some("UTC"));
        let hhmm = now.format("%H:%M").to_string();
        let fx = fixture(
            move |c| {
                c.daily.slots = vec![rekindle_config::model::DailySlotConfig {
                    enabled: true,
                    time: hhmm,
                    prompt: "daily greeting".to_string(),
                }];
            },
            Arc::new(EchoProvider),
        )
        .await;
        fx.profiles
            .update("s1", |p| {
                p.subscribed = true;
                p.daily_reminders_enabled = false;
            })
            .await;

        fx.scheduler.tick_once().await;
        assert!(fx.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation_and_flushes() {
        let fx = fixture(|c| c.scheduler.tick_interval_secs = 1, Arc::new(EchoProvider)).await;
        fx.sessions.update("s1", |s| s.last_activity_ts = 7).await;

        let cancel = CancellationToken::new();
        let scheduler = fx.scheduler;
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                scheduler.run(cancel).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("run should stop promptly on cancel")
            .unwrap();

        // The final flush must have written sessions.json.
        let written = fx.sessions.get("s1").await.unwrap();
        assert_eq!(written.last_activity_ts, 7);
        assert!(fx._dir.path().join("sessions.json").exists());
    }

    #[tokio::test]
    async fn idle_prompt_template_feeds_dispatch() {
        let fx = fixture(
            |c| c.idle.prompts = vec!["ping {session}".to_string()],
            Arc::new(EchoProvider),
        )
        .await;
        subscribe_with_due_idle(&fx, "s9").await;

        fx.scheduler.tick_once().await;

        let sent = fx.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "reply to: ping s9");
    }

    #[test]
    fn pick_idle_prompt_handles_empty_and_full() {
        assert!(pick_idle_prompt(&[]).is_none());
        let prompts = vec!["a".to_string(), "b".to_string()];
        let picked = pick_idle_prompt(&prompts).unwrap();
        assert!(prompts.contains(&picked));
    }
}
