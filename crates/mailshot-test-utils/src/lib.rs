// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for mailshot integration tests.
//!
//! Provides fakes and fixtures for fast, deterministic tests without an SMTP
//! server.
//!
//! # Components
//!
//! - [`MockTransport`] - Scripted transport that captures every message
//! - [`MemoryContactStore`] / [`CrashingContactStore`] - In-memory stores
//! - [`CampaignFixture`] - Campaign folder on disk with a ready-made runner setup

pub mod fixture;
pub mod mock_store;
pub mod mock_transport;

pub use fixture::CampaignFixture;
pub use mock_store::{CrashingContactStore, MemoryContactStore};
pub use mock_transport::{MockOutcome, MockTransport};
