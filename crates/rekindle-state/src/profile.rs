// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription profiles and the profile store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::JsonStore;

/// Per-session opt-in flag and personalization overrides.
///
/// Only sessions with `subscribed = true` are evaluated by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionProfile {
    pub subscribed: bool,

    /// Per-session override of the idle delay in minutes; `None` uses the
    /// global base with random fluctuation.
    pub idle_after_minutes: Option<u32>,

    /// Whether daily-slot messages are delivered to this session.
    pub daily_reminders_enabled: bool,

    /// Per-session "HH:MM-HH:MM" override of the global quiet window.
    pub quiet_hours: Option<String>,
}

impl Default for SubscriptionProfile {
    fn default() -> Self {
        Self {
            subscribed: false,
            idle_after_minutes: None,
            daily_reminders_enabled: true,
            quiet_hours: None,
        }
    }
}

/// Mutex-guarded map of session id -> [`SubscriptionProfile`] with
/// debounced JSON persistence (`profiles.json`).
#[derive(Clone)]
pub struct ProfileStore {
    inner: Arc<JsonStore<SubscriptionProfile>>,
}

impl ProfileStore {
    pub async fn open(path: PathBuf, debounce: Duration) -> Self {
        Self {
            inner: JsonStore::open(path, debounce).await,
        }
    }

    pub async fn get(&self, id: &str) -> Option<SubscriptionProfile> {
        self.inner.get(id).await
    }

    /// Mutate a session's profile, creating it lazily on first touch.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut SubscriptionProfile) -> R) -> R {
        self.inner.with_entry(id, f).await
    }

    /// Set the subscription flag, creating the profile if needed.
    pub async fn set_subscribed(&self, id: &str, subscribed: bool) {
        self.update(id, |p| p.subscribed = subscribed).await;
    }

    /// Snapshot of all subscribed sessions, the scheduler's work list.
    pub async fn subscribed_sessions(&self) -> Vec<(String, SubscriptionProfile)> {
        self.inner
            .snapshot()
            .await
            .into_iter()
            .filter(|(_, p)| p.subscribed)
            .collect()
    }

    pub async fn snapshot(&self) -> HashMap<String, SubscriptionProfile> {
        self.inner.snapshot().await
    }

    pub async fn flush_now(&self) {
        self.inner.flush_now().await;
    }
}
