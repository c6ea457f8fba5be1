// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message delivery capability consumed by the action dispatcher.

use async_trait::async_trait;

use crate::error::RekindleError;
use crate::types::{MessageId, OutboundMessage};

/// Delivers a proactive message to a session's conversation endpoint.
///
/// The engine makes no delivery guarantee beyond what the transport
/// acknowledges; a returned [`MessageId`] means the platform accepted the
/// message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RekindleError>;
}
