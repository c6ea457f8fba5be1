// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic reply provider for the Rekindle proactive agent.
//!
//! Wraps the Messages API behind the [`ReplyProvider`] capability: the
//! dispatcher hands over a prompt, bounded history, and system prompt,
//! and gets back the completion text. Streaming is deliberately not used;
//! proactive messages are short and sent whole.

pub mod client;
pub mod types;

use async_trait::async_trait;
use rekindle_config::RekindleConfig;
use rekindle_core::{ChatMessage, RekindleError, ReplyProvider, ReplyRequest};

pub use client::AnthropicClient;
use types::{ApiMessage, MessageRequest};

/// [`ReplyProvider`] backed by the Anthropic Messages API.
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Build a provider from configuration.
    ///
    /// The API key comes from `anthropic.api_key` or the
    /// `ANTHROPIC_API_KEY` environment variable; missing both is a
    /// configuration error.
    pub fn from_config(config: &RekindleConfig) -> Result<Self, RekindleError> {
        let api_key = config
            .anthropic
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                RekindleError::Config(
                    "Anthropic API key required: set anthropic.api_key or ANTHROPIC_API_KEY"
                        .to_string(),
                )
            })?;

        let client = AnthropicClient::new(&api_key, &config.anthropic.api_version)?;
        Ok(Self {
            client,
            model: config.anthropic.default_model.clone(),
            max_tokens: config.anthropic.max_tokens,
        })
    }

    /// Construct with an explicit client (used by tests with wiremock).
    pub fn with_client(client: AnthropicClient, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl ReplyProvider for AnthropicProvider {
    async fn generate(&self, request: ReplyRequest) -> Result<String, RekindleError> {
        let messages = build_messages(&request.history, &request.prompt);
        let system = if request.system_prompt.is_empty() {
            None
        } else {
            Some(request.system_prompt)
        };

        let response = self
            .client
            .complete_message(&MessageRequest {
                model: self.model.clone(),
                messages,
                system,
                max_tokens: self.max_tokens,
                stream: false,
            })
            .await?;

        Ok(response.text())
    }
}

/// Convert history plus the trigger prompt into API conversation turns.
///
/// The Messages API requires turns to start with "user" and strictly
/// alternate, so consecutive same-role entries are coalesced and any
/// leading assistant turns are dropped. The trigger prompt becomes the
/// final user turn.
fn build_messages(history: &[ChatMessage], prompt: &str) -> Vec<ApiMessage> {
    let mut messages: Vec<ApiMessage> = Vec::new();

    let turns = history
        .iter()
        .filter(|m| (m.role == "user" || m.role == "assistant") && !m.content.is_empty())
        .map(|m| (m.role.as_str(), m.content.as_str()))
        .chain(std::iter::once(("user", prompt)));

    for (role, content) in turns {
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(content);
            }
            _ => messages.push(ApiMessage {
                role: role.to_string(),
                content: content.to_string(),
            }),
        }
    }

    while messages.first().is_some_and(|m| m.role == "assistant") {
        messages.remove(0);
    }

    messages
}
