// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure trigger decision logic.
//!
//! Given session state, profile, config, and a zone-local "now", these
//! functions decide which trigger (if any) fires and produce the dedup
//! tag that prevents it firing again within its time bucket. All side
//! effects (dispatch, tag recording, deadline updates) live in the
//! scheduler loop.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;
use rekindle_config::model::{DailyConfig, IdleConfig};
use rekindle_state::{Reminder, ReminderSchedule, SessionState, SubscriptionProfile};

/// Floor for the computed idle delay. A profile override is used
/// verbatim; only the randomized global delay is clamped.
pub const MIN_IDLE_DELAY_MINUTES: i64 = 30;

/// Idle delay in minutes for a session: the profile override verbatim,
/// otherwise the global base with uniform random fluctuation, clamped to
/// [`MIN_IDLE_DELAY_MINUTES`].
///
/// The fluctuation keeps proactive greetings from arriving on a
/// mechanically regular schedule.
pub fn idle_delay_minutes(profile: &SubscriptionProfile, idle: &IdleConfig) -> i64 {
    if let Some(minutes) = profile.idle_after_minutes {
        return i64::from(minutes);
    }
    let base = i64::from(idle.after_minutes);
    let fluctuation = i64::from(idle.fluctuation_minutes);
    let jitter = if fluctuation > 0 {
        rand::thread_rng().gen_range(-fluctuation..=fluctuation)
    } else {
        0
    };
    (base + jitter).max(MIN_IDLE_DELAY_MINUTES)
}

/// Dedup tag embedding the exact zone-local minute, e.g.
/// `idle@2026-08-07 21:30`.
pub fn minute_tag(prefix: &str, now: &DateTime<FixedOffset>) -> String {
    format!("{prefix}@{}", now.format("%Y-%m-%d %H:%M"))
}

/// Outcome of evaluating the idle trigger for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleDecision {
    /// Disabled, no deadline reached, or no prior activity.
    NotDue,
    /// The deadline passed but this minute's tag already fired.
    AlreadyFired,
    /// The trigger fires now; record `tag` and clear the deadline on
    /// success.
    Fire { tag: String },
    /// The deadline is unset but the session has prior activity: repair
    /// it to `deadline` and defer firing to a later tick.
    Reschedule { deadline: i64 },
}

/// Evaluate the idle trigger.
///
/// Eligible when a deadline is scheduled and `now` is at or past it.
/// A session with activity but no deadline (state persisted by an older
/// build, or a completed idle cycle) gets its deadline repaired from
/// `last_activity_ts` instead of firing immediately.
pub fn evaluate_idle(
    state: &SessionState,
    profile: &SubscriptionProfile,
    idle: &IdleConfig,
    now: &DateTime<FixedOffset>,
) -> IdleDecision {
    if !idle.enabled {
        return IdleDecision::NotDue;
    }

    if state.next_idle_deadline == 0 {
        if state.last_activity_ts > 0 {
            let delay = idle_delay_minutes(profile, idle);
            return IdleDecision::Reschedule {
                deadline: state.last_activity_ts + delay * 60,
            };
        }
        return IdleDecision::NotDue;
    }

    if now.timestamp() < state.next_idle_deadline {
        return IdleDecision::NotDue;
    }

    let tag = minute_tag("idle", now);
    if state.has_fired(&tag) {
        return IdleDecision::AlreadyFired;
    }
    IdleDecision::Fire { tag }
}

/// A daily slot with its time parsed and duplicates removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    /// Position in the configured slot list, used in the dedup tag.
    pub index: usize,
    pub hour: u32,
    pub minute: u32,
    pub prompt: String,
}

/// Resolve configured daily slots for evaluation.
///
/// Disabled and unparsable slots are dropped. Duplicate clock-minutes are
/// collapsed (the first slot wins) so no two slots can fire in the same
/// minute.
pub fn resolve_daily_slots(daily: &DailyConfig) -> Vec<ResolvedSlot> {
    let mut seen = HashSet::new();
    let mut slots = Vec::new();

    for (index, slot) in daily.slots.iter().enumerate() {
        if !slot.enabled {
            continue;
        }
        let Some((hour, minute)) = rekindle_core::clock::parse_hhmm(&slot.time) else {
            continue;
        };
        if !seen.insert((hour, minute)) {
            continue;
        }
        slots.push(ResolvedSlot {
            index,
            hour,
            minute,
            prompt: slot.prompt.clone(),
        });
    }

    slots
}

/// Evaluate daily slots: at most one fires per tick per session.
///
/// Returns the matching slot and its per-day tag when the current minute
/// matches a slot whose tag has not fired today.
pub fn evaluate_daily<'a>(
    state: &SessionState,
    slots: &'a [ResolvedSlot],
    now: &DateTime<FixedOffset>,
) -> Option<(String, &'a ResolvedSlot)> {
    let slot = slots
        .iter()
        .find(|s| now.hour() == s.hour && now.minute() == s.minute)?;
    let tag = format!(
        "daily{}@{} {:02}:{:02}",
        slot.index + 1,
        now.format("%Y-%m-%d"),
        slot.hour,
        slot.minute
    );
    if state.has_fired(&tag) {
        return None;
    }
    Some((tag, slot))
}

/// Whether a session should be auto-unsubscribed: the user has been
/// silent for at least `max_no_reply_days` whole days. 0 disables the
/// check, as does a session that has never seen a user reply.
pub fn should_auto_unsubscribe(
    state: &SessionState,
    max_no_reply_days: u32,
    now_ts: i64,
) -> bool {
    if max_no_reply_days == 0 || state.last_user_reply_ts <= 0 {
        return false;
    }
    let days_silent = (now_ts - state.last_user_reply_ts) / 86_400;
    days_silent >= i64::from(max_no_reply_days)
}

/// A due reminder with its dedup tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFire {
    pub tag: String,
    /// One-shot reminders are removed after the attempt regardless of
    /// outcome.
    pub one_shot: bool,
}

/// Whether a reminder is due at the current zone-local minute.
///
/// Daily reminders match the exact minute. One-shot reminders fire when
/// the minute-truncated now is at or past the scheduled time, so a
/// reminder that came due while the process was down still fires; its tag
/// embeds the *scheduled* minute.
pub fn reminder_due(reminder: &Reminder, now: &DateTime<FixedOffset>) -> Option<ReminderFire> {
    match &reminder.schedule {
        ReminderSchedule::Daily { hour, minute } => {
            if now.hour() == *hour && now.minute() == *minute {
                Some(ReminderFire {
                    tag: format!("remind_daily_{}@{}", reminder.id, now.format("%Y-%m-%d")),
                    one_shot: false,
                })
            } else {
                None
            }
        }
        ReminderSchedule::Once { at } => {
            let now_minute = now
                .naive_local()
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or_else(|| now.naive_local());
            if now_minute >= *at {
                Some(ReminderFire {
                    tag: format!("remind_once_{}@{}", reminder.id, at.format("%Y-%m-%d %H:%M")),
                    one_shot: true,
                })
            } else {
                None
            }
        }
    }
}
