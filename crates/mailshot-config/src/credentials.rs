// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP credential provider.
//!
//! Credentials come from `SMTP_USER` and `SMTP_PASSWORD`, read once at
//! startup and handed to the dispatcher. They never appear in campaign files
//! or in the contact store.

use secrecy::SecretString;
use tracing::debug;

use mailshot_core::MailshotError;

/// Environment variable holding the SMTP login.
pub const SMTP_USER_VAR: &str = "SMTP_USER";

/// Environment variable holding the SMTP password.
pub const SMTP_PASSWORD_VAR: &str = "SMTP_PASSWORD";

/// Login for the SMTP relay. The password is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: SecretString,
}

impl SmtpCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Reads credentials from the process environment, after loading a
    /// `.env` file from the working directory if one exists.
    pub fn from_env() -> Result<Self, MailshotError> {
        if dotenv::dotenv().is_ok() {
            debug!("loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MailshotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let not_set =
            |key: &str| MailshotError::Config(format!("environment variable {key} is not set"));
        let user = lookup(SMTP_USER_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| not_set(SMTP_USER_VAR))?;
        // Passwords are passed through untouched; surrounding spaces may be significant.
        let password = lookup(SMTP_PASSWORD_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| not_set(SMTP_PASSWORD_VAR))?;
        Ok(Self::new(user, password))
    }
}
