// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation-history capability and the fixed-priority fallback chain.
//!
//! Prompt building wants recent context but must tolerate hosts that
//! expose none. Sources are tried in a fixed order; the first non-empty
//! result wins, and a source error only demotes to the next source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::RekindleError;
use crate::types::{ChatMessage, SessionId};

/// Best-effort provider of recent conversation history for a session.
///
/// An empty result is a valid, non-error outcome.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch(&self, session: &SessionId) -> Result<Vec<ChatMessage>, RekindleError>;
}

/// A fixed-priority chain of history sources.
#[derive(Clone, Default)]
pub struct HistoryChain {
    sources: Vec<Arc<dyn HistorySource>>,
}

impl HistoryChain {
    pub fn new(sources: Vec<Arc<dyn HistorySource>>) -> Self {
        Self { sources }
    }

    /// Appends a source at the lowest priority.
    pub fn push(&mut self, source: Arc<dyn HistorySource>) {
        self.sources.push(source);
    }

    /// Fetch history for a session: first non-empty source wins.
    ///
    /// Source errors are logged and treated as empty. Returns an empty
    /// vec when every source is empty or failing.
    pub async fn fetch(&self, session: &SessionId) -> Vec<ChatMessage> {
        for source in &self.sources {
            match source.fetch(session).await {
                Ok(messages) if !messages.is_empty() => return messages,
                Ok(_) => {}
                Err(e) => {
                    debug!(session = session.as_str(), error = %e, "history source failed, trying next");
                }
            }
        }
        Vec::new()
    }
}
