// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Rekindle proactive agent.
//!
//! This crate provides the foundational trait definitions, error type,
//! shared types, and the timezone/quiet-hours clock utility used
//! throughout the Rekindle workspace.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RekindleError;
pub use types::{ChatMessage, MessageId, OutboundMessage, ReplyRequest, SessionId};

pub use traits::{
    FixedProvider, HistoryChain, HistorySource, NoProvider, PersonaResolver, ReplyProvider,
    ReplyProviderResolver, StaticPersona, Transport,
};
