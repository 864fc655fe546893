// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail transport trait for SMTP and test doubles.

use async_trait::async_trait;

use crate::error::MailshotError;
use crate::types::{MessageReceipt, OutboundEmail};

/// Delivers rendered messages.
///
/// A message is either fully accepted by the transport or reported as failed.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Returns the transport name for logs.
    fn name(&self) -> &str;

    /// Opens and authenticates a session without sending anything.
    async fn verify(&self) -> Result<(), MailshotError>;

    /// Sends one message.
    async fn send(&self, email: &OutboundEmail) -> Result<MessageReceipt, MailshotError>;
}
