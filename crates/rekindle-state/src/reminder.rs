// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminders and the reminder store.
//!
//! Reminders are created by an explicit user command (handled by the host
//! command surface) and fired by the scheduler. A one-shot reminder is
//! removed after its single fire attempt; a daily reminder persists and
//! dedups through a dated tag.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::store::JsonStore;

/// When a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderSchedule {
    /// Fires once at the given zone-local date-time (minute precision).
    Once { at: NaiveDateTime },
    /// Fires every day at the given zone-local time.
    Daily { hour: u32, minute: u32 },
}

impl ReminderSchedule {
    /// Parse a user-facing schedule string: `"YYYY-MM-DD HH:MM"` for a
    /// one-shot reminder, `"HH:MM"` for a daily one.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
            return Some(Self::Once { at });
        }
        rekindle_core::clock::parse_hhmm(s).map(|(hour, minute)| Self::Daily { hour, minute })
    }
}

impl std::fmt::Display for ReminderSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Once { at } => write!(f, "{}", at.format("%Y-%m-%d %H:%M")),
            Self::Daily { hour, minute } => write!(f, "{hour:02}:{minute:02} daily"),
        }
    }
}

/// A user-created reminder scoped to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub session_id: String,
    pub content: String,
    pub schedule: ReminderSchedule,
    /// Unix seconds at creation; used for stable listing order.
    pub created_at: i64,
}

/// Mutex-guarded map of reminder id -> [`Reminder`] with debounced JSON
/// persistence (`reminders.json`).
#[derive(Clone)]
pub struct ReminderStore {
    inner: Arc<JsonStore<Reminder>>,
}

impl ReminderStore {
    pub async fn open(path: PathBuf, debounce: Duration) -> Self {
        Self {
            inner: JsonStore::open(path, debounce).await,
        }
    }

    /// Create and persist a reminder, returning it with its generated id.
    pub async fn add(
        &self,
        session_id: &str,
        content: &str,
        schedule: ReminderSchedule,
        now_ts: i64,
    ) -> Reminder {
        let reminder = Reminder {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            content: content.to_string(),
            schedule,
            created_at: now_ts,
        };
        let stored = reminder.clone();
        self.inner
            .with_map(move |map| {
                map.insert(stored.id.clone(), stored);
            })
            .await;
        reminder
    }

    /// All reminders for a session, oldest first.
    pub async fn list_for_session(&self, session_id: &str) -> Vec<Reminder> {
        let mut reminders: Vec<Reminder> = self
            .inner
            .snapshot()
            .await
            .into_values()
            .filter(|r| r.session_id == session_id)
            .collect();
        reminders.sort_by_key(|r| r.created_at);
        reminders
    }

    /// Delete a reminder only if it belongs to `session_id`.
    ///
    /// Returns whether anything was removed; the ownership guard keeps
    /// one session's command surface from deleting another's reminders.
    pub async fn delete(&self, id: &str, session_id: &str) -> bool {
        self.inner
            .with_map(|map| {
                if map.get(id).is_some_and(|r| r.session_id == session_id) {
                    map.remove(id);
                    true
                } else {
                    false
                }
            })
            .await
    }

    /// Unconditionally remove a reminder (one-shot cleanup after a fire
    /// attempt).
    pub async fn remove(&self, id: &str) {
        self.inner
            .with_map(|map| {
                map.remove(id);
            })
            .await;
    }

    pub async fn snapshot(&self) -> HashMap<String, Reminder> {
        self.inner.snapshot().await
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn flush_now(&self) {
        self.inner.flush_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_once_schedule() {
        let schedule = ReminderSchedule::parse("2026-08-07 21:30").unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 8, 7)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        assert_eq!(schedule, ReminderSchedule::Once { at: expected });
    }

    #[test]
    fn parse_daily_schedule() {
        assert_eq!(
            ReminderSchedule::parse("8:30"),
            Some(ReminderSchedule::Daily { hour: 8, minute: 30 })
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(ReminderSchedule::parse("tomorrow-ish"), None);
        assert_eq!(ReminderSchedule::parse("2026-08-07"), None);
        assert_eq!(ReminderSchedule::parse("25:00"), None);
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            ReminderSchedule::Daily { hour: 9, minute: 5 }.to_string(),
            "09:05 daily"
        );
        assert_eq!(
            ReminderSchedule::parse("2026-01-02 03:04").unwrap().to_string(),
            "2026-01-02 03:04"
        );
    }

    #[tokio::test]
    async fn add_list_delete_flow() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ReminderStore::open(
            dir.path().join("reminders.json"),
            Duration::from_millis(10),
        )
        .await;

        let r1 = store
            .add("s1", "stretch", ReminderSchedule::Daily { hour: 10, minute: 0 }, 100)
            .await;
        let _r2 = store
            .add("s2", "other session", ReminderSchedule::Daily { hour: 11, minute: 0 }, 200)
            .await;
        let r3 = store
            .add("s1", "sleep early", ReminderSchedule::Daily { hour: 23, minute: 0 }, 300)
            .await;

        let listed = store.list_for_session("s1").await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, r1.id, "oldest first");
        assert_eq!(listed[1].id, r3.id);

        // Wrong session cannot delete.
        assert!(!store.delete(&r1.id, "s2").await);
        assert!(store.delete(&r1.id, "s1").await);
        assert_eq!(store.list_for_session("s1").await.len(), 1);
    }

    #[tokio::test]
    async fn reminders_survive_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reminders.json");

        let id = {
            let store = ReminderStore::open(path.clone(), Duration::from_secs(60)).await;
            let r = store
                .add(
                    "s1",
                    "water the plants",
                    ReminderSchedule::parse("2026-09-01 08:00").unwrap(),
                    100,
                )
                .await;
            store.flush_now().await;
            r.id
        };

        let store = ReminderStore::open(path, Duration::from_secs(60)).await;
        let reminders = store.snapshot().await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[&id].content, "water the plants");
    }
}
