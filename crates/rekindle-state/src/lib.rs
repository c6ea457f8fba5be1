// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State stores for the Rekindle proactive agent.
//!
//! Four JSON-backed stores share one persistence pattern: an in-memory
//! mutex-guarded map, mutated by the activity pipeline and the scheduler,
//! flushed to disk through a single-slot debouncer so a burst of
//! mutations costs one write. Shutdown flushes every store
//! unconditionally.

pub mod debounce;
pub mod history;
pub mod persist;
pub mod profile;
pub mod reminder;
pub mod session;

mod store;

pub use debounce::Debouncer;
pub use history::ExchangeCache;
pub use profile::{ProfileStore, SubscriptionProfile};
pub use reminder::{Reminder, ReminderSchedule, ReminderStore};
pub use session::{SessionState, SessionStore, FIRED_TAG_TTL_SECS};
