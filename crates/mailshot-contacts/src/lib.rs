// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact store backed by the campaign's CSV file.
//!
//! The CSV is both the input (rows still pending) and the durable record of
//! what has been sent. Rewrites go through a temp file in the same directory
//! and an atomic rename, so a crash mid-write leaves the previous file intact.

pub mod csv_store;

pub use csv_store::{CsvContactStore, REQUIRED_COLUMNS};
