// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::MailshotConfig;

/// Validates a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MailshotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.smtp.host.trim();
    if host.is_empty() {
        fail("smtp.host must not be empty".to_string());
    } else if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == ':')
    {
        fail(format!("smtp.host `{host}` is not a valid hostname"));
    }

    if config.smtp.port == 0 {
        fail("smtp.port must be between 1 and 65535".to_string());
    }

    if config.smtp.timeout_secs == 0 {
        fail("smtp.timeout_secs must be greater than 0".to_string());
    }

    if let Some(from) = &config.smtp.from {
        if !looks_like_mailbox(from) {
            fail(format!(
                "smtp.from `{from}` must be an address or `Name <address>`"
            ));
        }
    }

    if config.campaigns.root.trim().is_empty() {
        fail("campaigns.root must not be empty".to_string());
    }

    if config.campaigns.default.trim().is_empty() {
        fail("campaigns.default must not be empty".to_string());
    }

    if !matches!(
        config.logging.level.to_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        fail(format!(
            "logging.level `{}` must be one of trace, debug, info, warn, error",
            config.logging.level
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Cheap shape check for `addr@host` or `Name <addr@host>`.
///
/// The dispatcher does the real parse; this only catches obvious typos early.
pub fn looks_like_mailbox(value: &str) -> bool {
    let value = value.trim();
    let address = match (value.find('<'), value.rfind('>')) {
        (Some(open), Some(close)) if open < close && close == value.len() - 1 => {
            &value[open + 1..close]
        }
        (None, None) => value,
        _ => return false,
    };
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}
