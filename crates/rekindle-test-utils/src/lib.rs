// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Rekindle workspace.
//!
//! Provides mock implementations of the provider and transport
//! capabilities plus a [`TestHarness`] that assembles the full engine
//! over a temp data directory for integration tests.

pub mod harness;
pub mod mock_provider;
pub mod mock_transport;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::MockReplyProvider;
pub use mock_transport::MockTransport;
