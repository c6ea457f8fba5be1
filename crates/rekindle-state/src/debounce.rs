// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-slot write debouncer.
//!
//! Each mutation schedules a delayed write and cancels any write still
//! pending from an earlier mutation, so a burst of mutations produces
//! exactly one disk write reflecting the final state. The slot holds at
//! most one pending timer at a time.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Cancel-and-reschedule timer with a single pending slot.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `write` to run after the debounce delay, cancelling any
    /// previously scheduled write that has not run yet.
    pub async fn schedule<F, Fut>(&self, write: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let token = CancellationToken::new();
        {
            let mut pending = self.pending.lock().await;
            if let Some(prev) = pending.replace(token.clone()) {
                prev.cancel();
            }
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    write().await;
                }
            }
        });
    }

    /// Cancel any pending write without running it.
    ///
    /// Used before an unconditional flush so the flush is not followed by
    /// a stale debounced write.
    pub async fn cancel_pending(&self) {
        if let Some(prev) = self.pending.lock().await.take() {
            prev.cancel();
        }
    }
}
