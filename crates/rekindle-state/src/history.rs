// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lightweight per-session cache of recent user/assistant exchanges.
//!
//! The engine records user turns and its own proactive replies here so
//! that prompt building still has context when the host exposes no
//! conversation history. It sits at the lowest priority of the history
//! fallback chain.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rekindle_core::{ChatMessage, HistorySource, RekindleError, SessionId};

use crate::store::JsonStore;

/// Bounded per-session deque of recent messages with debounced JSON
/// persistence (`history.json`).
#[derive(Clone)]
pub struct ExchangeCache {
    inner: Arc<JsonStore<VecDeque<ChatMessage>>>,
    max_len: usize,
}

impl ExchangeCache {
    pub async fn open(path: PathBuf, debounce: Duration, max_len: usize) -> Self {
        Self {
            inner: JsonStore::open(path, debounce).await,
            max_len,
        }
    }

    /// Append a message, evicting the oldest entries past the cap.
    pub async fn push(&self, session_id: &str, message: ChatMessage) {
        let max_len = self.max_len;
        self.inner
            .with_entry(session_id, move |deque| {
                deque.push_back(message);
                while deque.len() > max_len {
                    deque.pop_front();
                }
            })
            .await;
    }

    /// Recent messages for a session, oldest first.
    pub async fn recent(&self, session_id: &str) -> Vec<ChatMessage> {
        self.inner
            .get(session_id)
            .await
            .map(|deque| deque.into_iter().collect())
            .unwrap_or_default()
    }

    pub async fn flush_now(&self) {
        self.inner.flush_now().await;
    }
}

#[async_trait]
impl HistorySource for ExchangeCache {
    async fn fetch(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RekindleError> {
        Ok(self.recent(session.as_str()).await)
    }
}
