// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every mailshot component.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used by the store, resolver, renderer, dispatcher and runner.
///
/// Variants fall into two classes. Fatal errors (`Config`, `Format`, `Auth`,
/// `Storage`, `Internal`) stop a run. Per-row errors (`Render`,
/// `TransientSend`, `RecipientRejected`, `Timeout`) mark one contact as failed
/// and the run moves on.
#[derive(Debug, Error)]
pub enum MailshotError {
    /// Missing environment, campaign, or template. Raised before any row is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed contacts CSV (missing columns, bad `enviado` value).
    #[error("format error in {path}: {message}")]
    Format { path: String, message: String },

    /// A template placeholder could not be filled from the contact record.
    #[error("render error: {0}")]
    Render(String),

    /// The SMTP server rejected the credentials.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Network, TLS, or 4xx failure. The row stays pending for the next run.
    #[error("transient send failure: {message}")]
    TransientSend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server permanently refused the recipient or the message.
    #[error("recipient {recipient} rejected: {message}")]
    RecipientRejected { recipient: String, message: String },

    /// A dispatch attempt exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Reading or persisting the contact store failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MailshotError {
    /// Returns true if the error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_)
            | Self::Format { .. }
            | Self::Auth { .. }
            | Self::Storage { .. }
            | Self::Internal(_) => true,
            Self::Render(_)
            | Self::TransientSend { .. }
            | Self::RecipientRejected { .. }
            | Self::Timeout { .. } => false,
        }
    }

    /// Returns true if a later run is expected to succeed for the same row.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientSend { .. } | Self::Timeout { .. })
    }

    /// Wraps any error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
