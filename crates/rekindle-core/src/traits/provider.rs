// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply-generation capability consumed by the action dispatcher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RekindleError;
use crate::types::{ReplyRequest, SessionId};

/// Generates a proactive reply from a prompt, bounded history, and system
/// prompt.
///
/// Implementations own their timeout and retry policy; the scheduler
/// imposes none of its own.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Returns the completion text. An empty completion is a valid return
    /// value here; callers decide whether it counts as a failure.
    async fn generate(&self, request: ReplyRequest) -> Result<String, RekindleError>;
}

/// Resolves the reply provider to use for a session.
///
/// Dispatch treats a `None` resolution as a failed dispatch, never a
/// panic: a session without a usable provider simply produces no
/// proactive message.
pub trait ReplyProviderResolver: Send + Sync {
    fn provider_for(&self, session: &SessionId) -> Option<Arc<dyn ReplyProvider>>;
}

/// The simplest resolver: every session uses the same provider.
///
/// Used when the deployment pins a fixed provider instead of per-session
/// defaults.
pub struct FixedProvider {
    inner: Arc<dyn ReplyProvider>,
}

impl FixedProvider {
    pub fn new(inner: Arc<dyn ReplyProvider>) -> Self {
        Self { inner }
    }
}

impl ReplyProviderResolver for FixedProvider {
    fn provider_for(&self, _session: &SessionId) -> Option<Arc<dyn ReplyProvider>> {
        Some(self.inner.clone())
    }
}

/// A resolver that never yields a provider. Dispatch against it always
/// reports failure.
pub struct NoProvider;

impl ReplyProviderResolver for NoProvider {
    fn provider_for(&self, _session: &SessionId) -> Option<Arc<dyn ReplyProvider>> {
        None
    }
}
