// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the campaign runner and its persistence and transport backends.

pub mod store;
pub mod transport;

pub use store::ContactStore;
pub use transport::MailTransport;
