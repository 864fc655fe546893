// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP dispatcher for mailshot.
//!
//! This crate implements [`MailTransport`] on top of lettre's async SMTP
//! transport. Every failure is mapped onto the shared error taxonomy so the
//! runner can decide whether to abort, skip the row, or leave it pending.

pub mod classify;
pub mod message;

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use mailshot_config::SmtpCredentials;
use mailshot_config::model::{SmtpConfig, SmtpSecurity};
use mailshot_core::{MailTransport, MailshotError, MessageReceipt, OutboundEmail};

pub use crate::classify::{classify_code, classify_error};
pub use crate::message::{build_message, parse_mailbox};

/// Sends campaign emails through an authenticated SMTP relay.
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
    timeout: Duration,
}

impl SmtpDispatcher {
    /// Builds a dispatcher for the relay in `config`.
    ///
    /// The sender is `from` if given, else `config.from`, else the SMTP login.
    /// No connection is opened until [`MailTransport::verify`] or the first send.
    pub fn new(
        config: &SmtpConfig,
        credentials: &SmtpCredentials,
        from: Option<&str>,
    ) -> Result<Self, MailshotError> {
        let sender = from
            .or(config.from.as_deref())
            .unwrap_or(credentials.user.as_str());
        let from = parse_mailbox(sender)?;

        let builder = match config.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpSecurity::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &config.host,
            )),
        }
        .map_err(|e| MailshotError::Config(format!("invalid SMTP host {}: {e}", config.host)))?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.expose_secret().to_string(),
            ))
            .timeout(Some(timeout))
            .build();

        info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            from = %from,
            "SMTP dispatcher initialized"
        );

        Ok(Self {
            transport,
            from,
            host: config.host.clone(),
            timeout,
        })
    }

    /// Sender mailbox used for every message.
    pub fn from(&self) -> &Mailbox {
        &self.from
    }
}

#[async_trait]
impl MailTransport for SmtpDispatcher {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn verify(&self) -> Result<(), MailshotError> {
        let attempt = tokio::time::timeout(self.timeout, self.transport.test_connection()).await;
        match attempt {
            Ok(Ok(true)) => {
                debug!(host = %self.host, "SMTP session verified");
                Ok(())
            }
            Ok(Ok(false)) => Err(MailshotError::TransientSend {
                message: format!("SMTP server {} did not answer NOOP", self.host),
                source: None,
            }),
            Ok(Err(e)) => Err(classify_error(e, &self.host)),
            Err(_) => Err(MailshotError::Timeout {
                duration: self.timeout,
            }),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<MessageReceipt, MailshotError> {
        let message = build_message(&self.from, email)?;
        let attempt = tokio::time::timeout(self.timeout, self.transport.send(message)).await;
        match attempt {
            Ok(Ok(response)) => {
                let text = response.message().collect::<Vec<_>>().join(" ");
                debug!(to = %email.to, code = %response.code(), "message accepted");
                Ok(MessageReceipt {
                    recipient: email.to.clone(),
                    response: Some(format!("{} {text}", response.code())),
                })
            }
            Ok(Err(e)) => Err(classify_error(e, &email.to)),
            Err(_) => Err(MailshotError::Timeout {
                duration: self.timeout,
            }),
        }
    }
}
