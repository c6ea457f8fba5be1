// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Rekindle proactive agent.

use thiserror::Error;

/// The primary error type used across all Rekindle capability traits and
/// core operations.
#[derive(Debug, Error)]
pub enum RekindleError {
    /// Configuration errors (invalid TOML, malformed time strings, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence errors (state file read/write, serialization).
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (message delivery failure, connection loss).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reply provider errors (API failure, empty completion, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
