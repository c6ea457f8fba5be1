// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session runtime state and the session state store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::JsonStore;

/// Fired tags older than this are evicted on every write, bounding the
/// dedup ledger.
pub const FIRED_TAG_TTL_SECS: i64 = 7 * 86_400;

/// Runtime state tracked per conversation session.
///
/// All timestamps are unix seconds in UTC; calendar-dependent decisions
/// (tags, slot matching) are made on the zone-local clock by the
/// evaluator, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Last inbound or outbound activity.
    pub last_activity_ts: i64,

    /// Last time the human participant spoke; drives auto-unsubscribe.
    pub last_user_reply_ts: i64,

    /// Consecutive proactive sends that failed; reset on user activity.
    pub consecutive_no_reply_count: u32,

    /// Absolute time at which the idle trigger becomes eligible.
    /// 0 = unscheduled.
    pub next_idle_deadline: i64,

    /// Dedup ledger: tag -> fired-at timestamp. A present tag never fires
    /// its trigger again; tags embed the calendar day and/or minute so
    /// rollover is natural.
    pub fired_tags: HashMap<String, i64>,
}

impl SessionState {
    pub fn has_fired(&self, tag: &str) -> bool {
        self.fired_tags.contains_key(tag)
    }

    /// Record a fired tag, evicting entries past the TTL.
    pub fn mark_fired(&mut self, tag: impl Into<String>, now_ts: i64) {
        self.fired_tags
            .retain(|_, fired_at| now_ts - *fired_at < FIRED_TAG_TTL_SECS);
        self.fired_tags.insert(tag.into(), now_ts);
    }
}

/// Mutex-guarded map of session id -> [`SessionState`] with debounced
/// JSON persistence (`sessions.json`).
///
/// Handles are cheap clones over shared state; inbound-activity handling
/// and the scheduler tick may mutate concurrently.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<JsonStore<SessionState>>,
}

impl SessionStore {
    pub async fn open(path: PathBuf, debounce: Duration) -> Self {
        Self {
            inner: JsonStore::open(path, debounce).await,
        }
    }

    pub async fn get(&self, id: &str) -> Option<SessionState> {
        self.inner.get(id).await
    }

    /// Mutate a session's state, creating it lazily on first touch.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        self.inner.with_entry(id, f).await
    }

    pub async fn snapshot(&self) -> HashMap<String, SessionState> {
        self.inner.snapshot().await
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    /// Cancel any pending debounced write and persist immediately.
    pub async fn flush_now(&self) {
        self.inner.flush_now().await;
    }
}
