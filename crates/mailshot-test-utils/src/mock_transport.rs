// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock mail transport for deterministic testing.
//!
//! `MockTransport` implements `MailTransport` with per-address scripted
//! outcomes and captures every accepted message for assertion in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mailshot_core::{MailTransport, MailshotError, MessageReceipt, OutboundEmail};

/// Result a scripted send or verify produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    Accept,
    /// 535 bad credentials.
    AuthFailure,
    /// 451 try again later.
    Transient,
    /// 550 mailbox unavailable.
    Reject,
    /// Deadline exceeded.
    Timeout,
}

impl MockOutcome {
    fn into_error(self, recipient: &str) -> Option<MailshotError> {
        match self {
            Self::Accept => None,
            Self::AuthFailure => Some(MailshotError::Auth {
                message: "535 5.7.8 authentication credentials invalid".into(),
            }),
            Self::Transient => Some(MailshotError::TransientSend {
                message: "451 4.3.0 try again later".into(),
                source: None,
            }),
            Self::Reject => Some(MailshotError::RecipientRejected {
                recipient: recipient.to_string(),
                message: "550 5.1.1 mailbox unavailable".into(),
            }),
            Self::Timeout => Some(MailshotError::Timeout {
                duration: Duration::from_secs(30),
            }),
        }
    }
}

/// A scripted mail transport for testing.
///
/// Sends to an address with no script are accepted. A scripted address
/// consumes one outcome per attempt and falls back to accepting once the
/// script runs out.
#[derive(Clone, Default)]
pub struct MockTransport {
    scripts: Arc<Mutex<HashMap<String, VecDeque<MockOutcome>>>>,
    default_outcome: Arc<Mutex<Option<MockOutcome>>>,
    verify_outcome: Arc<Mutex<Option<MockOutcome>>>,
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    attempts: Arc<Mutex<Vec<String>>>,
    verify_calls: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `outcome` for the next attempt to `address`.
    pub async fn script(&self, address: &str, outcome: MockOutcome) {
        self.scripts
            .lock()
            .await
            .entry(address.to_lowercase())
            .or_default()
            .push_back(outcome);
    }

    /// Outcome for every send to an address without a script.
    pub async fn fail_all_with(&self, outcome: MockOutcome) {
        *self.default_outcome.lock().await = Some(outcome);
    }

    /// Outcome of the next `verify()` calls.
    pub async fn fail_verify_with(&self, outcome: MockOutcome) {
        *self.verify_outcome.lock().await = Some(outcome);
    }

    /// Messages accepted through `send()`, in order.
    pub async fn sent_messages(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }

    /// Recipients of accepted messages, in order.
    pub async fn sent_to(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.to.clone()).collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Recipients of every `send()` call, accepted or not.
    pub async fn attempts(&self) -> Vec<String> {
        self.attempts.lock().await.clone()
    }

    pub async fn verify_calls(&self) -> usize {
        *self.verify_calls.lock().await
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.attempts.lock().await.clear();
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn verify(&self) -> Result<(), MailshotError> {
        *self.verify_calls.lock().await += 1;
        let outcome = (*self.verify_outcome.lock().await).unwrap_or(MockOutcome::Accept);
        match outcome.into_error("verify") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<MessageReceipt, MailshotError> {
        self.attempts.lock().await.push(email.to.clone());

        let scripted = self
            .scripts
            .lock()
            .await
            .get_mut(&email.to)
            .and_then(VecDeque::pop_front);
        let outcome = match scripted {
            Some(outcome) => outcome,
            None => (*self.default_outcome.lock().await).unwrap_or(MockOutcome::Accept),
        };

        if let Some(err) = outcome.into_error(&email.to) {
            return Err(err);
        }
        self.sent.lock().await.push(email.clone());
        Ok(MessageReceipt {
            recipient: email.to.clone(),
            response: Some("250 2.0.0 Ok: queued".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> OutboundEmail {
        OutboundEmail {
            to: to.into(),
            to_name: "Test".into(),
            subject: "Hi".into(),
            html_body: "<p>Hi</p>".into(),
            inline_images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn accepts_by_default_and_captures() {
        let transport = MockTransport::new();
        transport.verify().await.unwrap();
        transport.send(&email("a@b.c")).await.unwrap();
        assert_eq!(transport.sent_to().await, vec!["a@b.c"]);
        assert_eq!(transport.verify_calls().await, 1);
    }

    #[tokio::test]
    async fn scripts_are_consumed_in_order() {
        let transport = MockTransport::new();
        transport.script("a@b.c", MockOutcome::Transient).await;
        transport.script("a@b.c", MockOutcome::Reject).await;

        let first = transport.send(&email("a@b.c")).await.unwrap_err();
        assert!(first.is_retryable());
        let second = transport.send(&email("a@b.c")).await.unwrap_err();
        assert!(matches!(second, MailshotError::RecipientRejected { .. }));
        transport.send(&email("a@b.c")).await.unwrap();

        assert_eq!(transport.attempts().await.len(), 3);
        assert_eq!(transport.sent_count().await, 1);
    }

    #[tokio::test]
    async fn verify_failure_is_reported() {
        let transport = MockTransport::new();
        transport.fail_verify_with(MockOutcome::AuthFailure).await;
        let err = transport.verify().await.unwrap_err();
        assert!(err.is_fatal());
    }
}
