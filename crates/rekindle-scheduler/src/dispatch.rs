// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action dispatcher: turns a firing trigger into a delivered message.
//!
//! One dispatch resolves the provider, builds a prompt from the trigger
//! template and recent history, calls the provider, and sends the result
//! through the transport. Any failure at any step reports `false`; the
//! caller increments the session's no-reply counter. State is only
//! touched after a confirmed send, so a failed dispatch is safe to retry.

use std::sync::Arc;

use rekindle_config::model::{RekindleConfig, SchedulerConfig};
use rekindle_core::clock;
use rekindle_core::{
    ChatMessage, HistoryChain, OutboundMessage, PersonaResolver, ReplyProviderResolver,
    ReplyRequest, SessionId, Transport,
};
use rekindle_state::{ExchangeCache, SessionStore};
use tracing::{debug, info, warn};

/// Prompt used when a trigger has no template configured.
pub const DEFAULT_CONTINUATION_PROMPT: &str =
    "Continue the conversation naturally, as if checking in on the user after a while.";

/// Dispatch-time settings lifted out of the scheduler config.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub history_depth: usize,
    pub append_timestamp: bool,
    pub time_format: String,
    pub timezone: Option<String>,
}

impl From<&SchedulerConfig> for DispatchOptions {
    fn from(cfg: &SchedulerConfig) -> Self {
        Self {
            history_depth: cfg.history_depth,
            append_timestamp: cfg.append_timestamp,
            time_format: cfg.time_format.clone(),
            timezone: cfg.timezone.clone(),
        }
    }
}

/// Orchestrates prompt building, reply generation, and delivery for one
/// firing trigger.
pub struct Dispatcher {
    providers: Arc<dyn ReplyProviderResolver>,
    transport: Arc<dyn Transport>,
    history: HistoryChain,
    persona: Arc<dyn PersonaResolver>,
    sessions: SessionStore,
    exchanges: ExchangeCache,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(
        providers: Arc<dyn ReplyProviderResolver>,
        transport: Arc<dyn Transport>,
        history: HistoryChain,
        persona: Arc<dyn PersonaResolver>,
        sessions: SessionStore,
        exchanges: ExchangeCache,
        options: DispatchOptions,
    ) -> Self {
        Self {
            providers,
            transport,
            history,
            persona,
            sessions,
            exchanges,
            options,
        }
    }

    /// Convenience constructor pulling options from the full config.
    pub fn from_config(
        config: &RekindleConfig,
        providers: Arc<dyn ReplyProviderResolver>,
        transport: Arc<dyn Transport>,
        history: HistoryChain,
        persona: Arc<dyn PersonaResolver>,
        sessions: SessionStore,
        exchanges: ExchangeCache,
    ) -> Self {
        Self::new(
            providers,
            transport,
            history,
            persona,
            sessions,
            exchanges,
            DispatchOptions::from(&config.scheduler),
        )
    }

    /// Generate and deliver one proactive message.
    ///
    /// `template` is the trigger's prompt template (`None` falls back to
    /// the default continuation prompt); `reminder_content` is set for
    /// reminder triggers and fills `{reminder_content}`.
    ///
    /// Returns `true` only when the transport confirmed the send.
    pub async fn dispatch(
        &self,
        session: &SessionId,
        template: Option<&str>,
        reminder_content: Option<&str>,
    ) -> bool {
        let Some(provider) = self.providers.provider_for(session) else {
            warn!(session = session.as_str(), "no reply provider resolved");
            return false;
        };

        let mut history = self.history.fetch(session).await;
        if self.options.history_depth > 0 && history.len() > self.options.history_depth {
            let excess = history.len() - self.options.history_depth;
            history.drain(..excess);
        }
        let (last_user, last_ai) = last_exchange(&history);

        let now_str = clock::format_now(&self.options.time_format, self.options.timezone.as_deref());
        let prompt = match template {
            Some(t) => render_template(
                t,
                &now_str,
                &last_user,
                &last_ai,
                session.as_str(),
                reminder_content,
            ),
            None => DEFAULT_CONTINUATION_PROMPT.to_string(),
        };

        let system_prompt = self.persona.system_prompt_for(session).await;
        if system_prompt.is_empty() {
            debug!(session = session.as_str(), "no system prompt available");
        }

        let completion = match provider
            .generate(ReplyRequest {
                prompt,
                history,
                system_prompt,
            })
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(session = session.as_str(), error = %e, "reply generation failed");
                return false;
            }
        };

        let text = completion.trim();
        if text.is_empty() {
            warn!(session = session.as_str(), "empty completion, treating as failure");
            return false;
        }

        let mut outgoing = if reminder_content.is_some() {
            format!("⏰ {text}")
        } else {
            text.to_string()
        };
        if self.options.append_timestamp {
            outgoing = format!("[{now_str}] {outgoing}");
        }

        if let Err(e) = self
            .transport
            .send(OutboundMessage {
                session_id: session.clone(),
                content: outgoing.clone(),
            })
            .await
        {
            warn!(session = session.as_str(), error = %e, "send failed");
            return false;
        }

        let now_ts = clock::now_in_zone(self.options.timezone.as_deref()).timestamp();
        self.sessions
            .update(session.as_str(), |s| s.last_activity_ts = now_ts)
            .await;
        self.exchanges
            .push(session.as_str(), ChatMessage::assistant(outgoing))
            .await;

        info!(session = session.as_str(), "proactive message sent");
        true
    }
}

/// The most recent user and assistant messages in the history, newest
/// occurrence of each role wins.
fn last_exchange(history: &[ChatMessage]) -> (String, String) {
    let mut last_user = String::new();
    let mut last_ai = String::new();
    for message in history.iter().rev() {
        if last_user.is_empty() && message.role == "user" {
            last_user = message.content.clone();
        }
        if last_ai.is_empty() && message.role == "assistant" {
            last_ai = message.content.clone();
        }
        if !last_user.is_empty() && !last_ai.is_empty() {
            break;
        }
    }
    (last_user, last_ai)
}

/// Substitute the supported placeholders in a prompt template.
fn render_template(
    template: &str,
    now: &str,
    last_user: &str,
    last_ai: &str,
    session: &str,
    reminder_content: Option<&str>,
) -> String {
    let mut rendered = template
        .replace("{now}", now)
        .replace("{last_user}", last_user)
        .replace("{last_ai}", last_ai)
        .replace("{session}", session);
    if let Some(content) = reminder_content {
        rendered = rendered.replace("{reminder_content}", content);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rekindle_core::{
        FixedProvider, HistorySource, MessageId, NoProvider, RekindleError, ReplyProvider,
        StaticPersona,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct QueueProvider {
        responses: StdMutex<VecDeque<Result<String, String>>>,
    }

    impl QueueProvider {
        fn with(responses: Vec<Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl ReplyProvider for QueueProvider {
        async fn generate(&self, _request: ReplyRequest) -> Result<String, RekindleError> {
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(RekindleError::Provider {
                    message,
                    source: None,
                }),
                None => Ok("fallback reply".to_string()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: StdMutex<Vec<OutboundMessage>>,
        fail: std::sync::atomic::AtomicBool,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RekindleError> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(RekindleError::Channel {
                    message: "delivery refused".into(),
                    source: None,
                });
            }
            self.sent.lock().unwrap().push(msg);
            Ok(MessageId("m-1".into()))
        }
    }

    struct FixedHistory(Vec<ChatMessage>);

    #[async_trait]
    impl HistorySource for FixedHistory {
        async fn fetch(&self, _s: &SessionId) -> Result<Vec<ChatMessage>, RekindleError> {
            Ok(self.0.clone())
        }
    }

    struct CapturingProvider {
        last_request: StdMutex<Option<ReplyRequest>>,
    }

    #[async_trait]
    impl ReplyProvider for CapturingProvider {
        async fn generate(&self, request: ReplyRequest) -> Result<String, RekindleError> {
            *self.last_request.lock().unwrap() = Some(request);
            Ok("captured".to_string())
        }
    }

    async fn build_dispatcher(
        provider: Arc<dyn ReplyProvider>,
        transport: Arc<RecordingTransport>,
        history: Vec<ChatMessage>,
        options: DispatchOptions,
    ) -> (Dispatcher, SessionStore, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let sessions = SessionStore::open(
            dir.path().join("sessions.json"),
            Duration::from_millis(10),
        )
        .await;
        let exchanges = ExchangeCache::open(
            dir.path().join("history.json"),
            Duration::from_millis(10),
            8,
        )
        .await;
        let dispatcher = Dispatcher::new(
            Arc::new(FixedProvider::new(provider)),
            transport,
            HistoryChain::new(vec![Arc::new(FixedHistory(history))]),
            Arc::new(StaticPersona("You are a companion.".into())),
            sessions.clone(),
            exchanges,
            options,
        );
        (dispatcher, sessions, dir)
    }

    fn options() -> DispatchOptions {
        DispatchOptions {
            history_depth: 8,
            append_timestamp: false,
            time_format: "%Y-%m-%d %H:%M".to_string(),
            timezone: Some("UTC".to_string()),
        }
    }

    #[tokio::test]
    async fn successful_dispatch_sends_and_updates_state() {
        let transport = Arc::new(RecordingTransport::default());
        let (dispatcher, sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Ok("hey, how did it go?".into())]),
            transport.clone(),
            vec![ChatMessage::user("talk later")],
            options(),
        )
        .await;

        let ok = dispatcher
            .dispatch(&SessionId::from("s1"), Some("check in"), None)
            .await;
        assert!(ok);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "hey, how did it go?");
        assert!(sessions.get("s1").await.unwrap().last_activity_ts > 0);
    }

    #[tokio::test]
    async fn empty_completion_is_failure() {
        let transport = Arc::new(RecordingTransport::default());
        let (dispatcher, sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Ok("   \n ".into())]),
            transport.clone(),
            vec![],
            options(),
        )
        .await;

        let ok = dispatcher.dispatch(&SessionId::from("s1"), None, None).await;
        assert!(!ok);
        assert!(transport.sent().is_empty());
        assert!(sessions.get("s1").await.is_none(), "state untouched on failure");
    }

    #[tokio::test]
    async fn provider_error_is_failure() {
        let transport = Arc::new(RecordingTransport::default());
        let (dispatcher, _sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Err("api unavailable".into())]),
            transport.clone(),
            vec![],
            options(),
        )
        .await;

        assert!(!dispatcher.dispatch(&SessionId::from("s1"), None, None).await);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_failure() {
        let transport = Arc::new(RecordingTransport::default());
        transport
            .fail
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let (dispatcher, sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Ok("hello".into())]),
            transport.clone(),
            vec![],
            options(),
        )
        .await;

        assert!(!dispatcher.dispatch(&SessionId::from("s1"), None, None).await);
        assert!(sessions.get("s1").await.is_none());
    }

    #[tokio::test]
    async fn missing_provider_is_failure_not_panic() {
        let dir = tempfile::TempDir::new().unwrap();
        let sessions = SessionStore::open(
            dir.path().join("sessions.json"),
            Duration::from_millis(10),
        )
        .await;
        let exchanges = ExchangeCache::open(
            dir.path().join("history.json"),
            Duration::from_millis(10),
            8,
        )
        .await;
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(
            Arc::new(NoProvider),
            transport.clone(),
            HistoryChain::default(),
            Arc::new(StaticPersona(String::new())),
            sessions,
            exchanges,
            options(),
        );

        assert!(!dispatcher.dispatch(&SessionId::from("s1"), None, None).await);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn reminder_sends_get_clock_prefix() {
        let transport = Arc::new(RecordingTransport::default());
        let (dispatcher, _sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Ok("time to stretch!".into())]),
            transport.clone(),
            vec![],
            options(),
        )
        .await;

        let ok = dispatcher
            .dispatch(
                &SessionId::from("s1"),
                Some("Remind about: {reminder_content}"),
                Some("stretching"),
            )
            .await;
        assert!(ok);
        assert_eq!(transport.sent()[0].content, "⏰ time to stretch!");
    }

    #[tokio::test]
    async fn timestamp_prefix_applies_when_configured() {
        let transport = Arc::new(RecordingTransport::default());
        let mut opts = options();
        opts.append_timestamp = true;
        opts.time_format = "%Y".to_string();
        let (dispatcher, _sessions, _dir) = build_dispatcher(
            QueueProvider::with(vec![Ok("hello".into())]),
            transport.clone(),
            vec![],
            opts,
        )
        .await;

        assert!(dispatcher.dispatch(&SessionId::from("s1"), None, None).await);
        let content = &transport.sent()[0].content;
        assert!(content.starts_with('['), "got {content}");
        assert!(content.ends_with("] hello"));
    }

    #[tokio::test]
    async fn template_placeholders_reach_the_provider() {
        let provider = Arc::new(CapturingProvider {
            last_request: StdMutex::new(None),
        });
        let transport = Arc::new(RecordingTransport::default());
        let history = vec![
            ChatMessage::user("older message"),
            ChatMessage::assistant("see you"),
            ChatMessage::user("good night"),
        ];
        let (dispatcher, _sessions, _dir) =
            build_dispatcher(provider.clone(), transport, history, options()).await;

        assert!(
            dispatcher
                .dispatch(
                    &SessionId::from("s1"),
                    Some("Last user said: {last_user} / you said: {last_ai} ({session})"),
                    None,
                )
                .await
        );

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(
            request.prompt,
            "Last user said: good night / you said: see you (s1)"
        );
        assert_eq!(request.history.len(), 3);
        assert_eq!(request.system_prompt, "You are a companion.");
    }

    #[tokio::test]
    async fn history_is_truncated_to_depth() {
        let provider = Arc::new(CapturingProvider {
            last_request: StdMutex::new(None),
        });
        let transport = Arc::new(RecordingTransport::default());
        let history: Vec<ChatMessage> = (0..20)
            .map(|i| ChatMessage::user(format!("m{i}")))
            .collect();
        let mut opts = options();
        opts.history_depth = 5;
        let (dispatcher, _sessions, _dir) =
            build_dispatcher(provider.clone(), transport, history, opts).await;

        assert!(dispatcher.dispatch(&SessionId::from("s1"), None, None).await);
        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.history.len(), 5);
        assert_eq!(request.history[0].content, "m15", "keeps the newest entries");
    }

    #[test]
    fn last_exchange_scans_from_newest() {
        let history = vec![
            ChatMessage::user("u1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("u2"),
        ];
        let (last_user, last_ai) = last_exchange(&history);
        assert_eq!(last_user, "u2");
        assert_eq!(last_ai, "a1");
    }

    #[test]
    fn render_template_leaves_unknown_placeholders() {
        let rendered = render_template("a {now} b {unknown}", "NOW", "", "", "s", None);
        assert_eq!(rendered, "a NOW b {unknown}");
    }
}
