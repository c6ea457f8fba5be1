// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console channel: proactive messages land on stdout.
//!
//! The session id is printed alongside each message so the single binary
//! can serve several logical sessions at once (the interactive stdin loop
//! only feeds one).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rekindle_core::{MessageId, OutboundMessage, RekindleError, Transport};

/// Transport that writes proactive messages to stdout.
pub struct ConsoleTransport {
    agent_name: String,
    sequence: AtomicU64,
}

impl ConsoleTransport {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            sequence: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RekindleError> {
        println!("{} -> {}: {}", self.agent_name, msg.session_id, msg.content);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        Ok(MessageId(format!("console-{seq}")))
    }
}
