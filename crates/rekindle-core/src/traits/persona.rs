// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona capability: resolves the system prompt for a session.

use async_trait::async_trait;

use crate::types::SessionId;

/// Best-effort system-prompt resolution.
///
/// Returns an empty string when no persona is available; dispatch treats
/// that as "no system prompt", never as an error.
#[async_trait]
pub trait PersonaResolver: Send + Sync {
    async fn system_prompt_for(&self, session: &SessionId) -> String;
}

/// A persona resolver that returns the same prompt for every session.
pub struct StaticPersona(pub String);

#[async_trait]
impl PersonaResolver for StaticPersona {
    async fn system_prompt_for(&self, _session: &SessionId) -> String {
        self.0.clone()
    }
}
