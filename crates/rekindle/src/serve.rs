// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rekindle serve` command implementation.
//!
//! Wires the proactive engine: JSON-backed stores, the Anthropic reply
//! provider, the console transport, and the scheduler loop. Stdin lines
//! are treated as user messages for the `console` session, so an idle
//! conversation can be watched re-kindling locally.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rekindle_anthropic::AnthropicProvider;
use rekindle_config::RekindleConfig;
use rekindle_core::{
    FixedProvider, HistoryChain, RekindleError, SessionId, StaticPersona,
};
use rekindle_scheduler::{ActivityRecorder, Dispatcher, Scheduler};
use rekindle_state::{ExchangeCache, ProfileStore, ReminderStore, SessionStore};
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};

use crate::console::ConsoleTransport;
use crate::shutdown;

/// Session id used for the interactive stdin channel.
const CONSOLE_SESSION: &str = "console";

/// Runs the `rekindle serve` command.
///
/// Initializes tracing and all stores, wires the dispatcher, and runs
/// the scheduler until a shutdown signal arrives. The scheduler flushes
/// every store on the way out.
pub async fn run_serve(config: RekindleConfig) -> Result<(), RekindleError> {
    init_tracing(&config.agent.log_level);

    info!(agent = config.agent.name.as_str(), "starting rekindle serve");

    let config = Arc::new(config);
    let data_dir = PathBuf::from(&config.storage.data_dir);
    let debounce = Duration::from_millis(config.storage.debounce_ms);

    let sessions = SessionStore::open(data_dir.join("sessions.json"), debounce).await;
    let profiles = ProfileStore::open(data_dir.join("profiles.json"), debounce).await;
    let reminders = ReminderStore::open(data_dir.join("reminders.json"), debounce).await;
    let exchanges = ExchangeCache::open(
        data_dir.join("history.json"),
        debounce,
        config.storage.exchange_cache_len,
    )
    .await;

    info!(
        sessions = sessions.len().await,
        reminders = reminders.len().await,
        data_dir = %data_dir.display(),
        "state loaded"
    );

    // Reply provider: Anthropic, pinned for every session.
    let provider = AnthropicProvider::from_config(&config).map_err(|e| {
        error!(error = %e, "failed to initialize Anthropic provider");
        eprintln!(
            "error: Anthropic API key required. Set anthropic.api_key in rekindle.toml \
             or the ANTHROPIC_API_KEY environment variable."
        );
        e
    })?;
    let providers = Arc::new(FixedProvider::new(Arc::new(provider)));

    let transport = Arc::new(ConsoleTransport::new(config.agent.name.clone()));

    // Persona: a file takes precedence over the inline prompt.
    let persona = Arc::new(StaticPersona(resolve_system_prompt(&config)));

    // History: only the engine's own exchange cache in this wiring; a
    // host embedding the engine prepends its conversation store here.
    let history = HistoryChain::new(vec![Arc::new(exchanges.clone())]);

    let dispatcher = Dispatcher::from_config(
        &config,
        providers,
        transport,
        history,
        persona,
        sessions.clone(),
        exchanges.clone(),
    );

    let recorder = ActivityRecorder::new(
        config.clone(),
        sessions.clone(),
        profiles.clone(),
        exchanges.clone(),
    );

    // The console session is always subscribed; proactive messages would
    // otherwise never target it.
    profiles.set_subscribed(CONSOLE_SESSION, true).await;

    let scheduler = Arc::new(Scheduler::new(
        config.clone(),
        sessions,
        profiles,
        reminders,
        exchanges,
        dispatcher,
    ));

    let cancel = shutdown::install_signal_handler();

    let scheduler_task = {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            scheduler.run(cancel).await;
        })
    };

    println!(
        "rekindle is watching the `{CONSOLE_SESSION}` session; type a message and leave it idle."
    );

    stdin_loop(&recorder, &cancel).await;

    if let Err(e) = scheduler_task.await {
        warn!(error = %e, "scheduler task ended abnormally");
    }

    info!("rekindle serve shutdown complete");
    Ok(())
}

/// Read stdin lines as user activity until shutdown.
async fn stdin_loop(recorder: &ActivityRecorder, cancel: &tokio_util::sync::CancellationToken) {
    let session = SessionId::from(CONSOLE_SESSION);
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if !line.is_empty() {
                            recorder.record_user_message(&session, line).await;
                        }
                    }
                    Ok(None) => {
                        // Stdin closed; keep serving until a signal arrives.
                        cancel.cancelled().await;
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "stdin read failed");
                        cancel.cancelled().await;
                        break;
                    }
                }
            }
            _ = cancel.cancelled() => {
                break;
            }
        }
    }
}

/// Resolve the persona system prompt from config: `system_prompt_file`
/// wins over the inline `system_prompt`; a missing file degrades to the
/// inline prompt with a warning.
fn resolve_system_prompt(config: &RekindleConfig) -> String {
    if let Some(path) = &config.agent.system_prompt_file {
        match std::fs::read_to_string(path) {
            Ok(content) => return content.trim().to_string(),
            Err(e) => {
                warn!(path = path.as_str(), error = %e, "failed to read system prompt file");
            }
        }
    }
    config.agent.system_prompt.clone().unwrap_or_default()
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rekindle={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
