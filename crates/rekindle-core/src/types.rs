// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Rekindle workspace.

use serde::{Deserialize, Serialize};

/// Unique identifier for a conversation session.
///
/// Sessions are the unit of proactive-trigger tracking: each has its own
/// state, subscription profile, and fired-tag ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

/// Unique identifier for a delivered message, returned by the transport
/// as a delivery acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A single turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A request to the reply-generation capability.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// The rendered trigger prompt.
    pub prompt: String,
    /// Bounded recent conversation history, oldest first.
    pub history: Vec<ChatMessage>,
    /// Resolved system prompt; empty string when no persona is available.
    pub system_prompt: String,
}

/// A proactive message to be delivered through a transport.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub session_id: SessionId,
    pub content: String,
}
