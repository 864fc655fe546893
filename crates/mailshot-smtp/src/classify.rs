// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps SMTP failures onto [`MailshotError`] classes.

use lettre::transport::smtp;

use mailshot_core::MailshotError;

/// Reply codes that mean the login itself was refused.
const AUTH_CODES: [u16; 3] = [530, 534, 535];

/// Classifies an SMTP reply code.
///
/// `recipient` is only used for the rejection message.
pub fn classify_code(code: u16, recipient: &str, message: impl Into<String>) -> MailshotError {
    let message = message.into();
    if AUTH_CODES.contains(&code) {
        MailshotError::Auth {
            message: format!("{code} {message}"),
        }
    } else if (500..600).contains(&code) {
        MailshotError::RecipientRejected {
            recipient: recipient.to_string(),
            message: format!("{code} {message}"),
        }
    } else {
        MailshotError::TransientSend {
            message: format!("{code} {message}"),
            source: None,
        }
    }
}

/// Classifies a lettre transport error raised while talking to `recipient`.
pub fn classify_error(err: smtp::Error, recipient: &str) -> MailshotError {
    if let Some(code) = err.status().and_then(|c| c.to_string().parse::<u16>().ok()) {
        return classify_code(code, recipient, err.to_string());
    }

    let text = err.to_string();
    if err.is_client() && is_auth_mechanism_failure(&text) {
        return MailshotError::Auth { message: text };
    }
    if err.is_permanent() {
        return MailshotError::RecipientRejected {
            recipient: recipient.to_string(),
            message: text,
        };
    }

    MailshotError::TransientSend {
        message: text,
        source: Some(Box::new(err)),
    }
}

/// Lettre reports a server that offers no usable AUTH mechanism as a client
/// error without a reply code.
fn is_auth_mechanism_failure(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    text.contains("authentication") || text.contains("mechanism")
}
