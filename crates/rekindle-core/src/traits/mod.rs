// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits consumed by the scheduling engine.
//!
//! The engine never talks to an LLM API, a messaging platform, or a host
//! conversation store directly; it consumes these interfaces and leaves
//! the implementations to adapter crates and the host.

pub mod history;
pub mod persona;
pub mod provider;
pub mod transport;

pub use history::{HistoryChain, HistorySource};
pub use persona::{PersonaResolver, StaticPersona};
pub use provider::{FixedProvider, NoProvider, ReplyProvider, ReplyProviderResolver};
pub use transport::Transport;
