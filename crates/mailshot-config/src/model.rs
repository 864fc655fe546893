// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application configuration structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level mailshot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailshotConfig {
    /// SMTP relay settings.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Where campaign directories live.
    #[serde(default)]
    pub campaigns: CampaignsConfig,

    /// Send loop policies.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587).
    #[default]
    Starttls,
    /// Implicit TLS (port 465).
    Tls,
    /// No encryption. Only for local test relays.
    None,
}

/// SMTP relay configuration. Credentials are not stored here; see
/// [`crate::credentials::SmtpCredentials`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub security: SmtpSecurity,

    /// Upper bound for one dispatch attempt, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `From` mailbox, e.g. `Spotter AI <info@spotter-ai.app>`.
    /// Defaults to the SMTP user address.
    #[serde(default)]
    pub from: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            security: SmtpSecurity::default(),
            timeout_secs: default_timeout_secs(),
            from: None,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.serviciodecorreo.es".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    30
}

/// Campaign directory settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignsConfig {
    /// Directory holding one sub-directory per campaign.
    #[serde(default = "default_campaigns_root")]
    pub root: String,

    /// Campaign sent when `--campaign` is not given.
    #[serde(default = "default_campaign")]
    pub default: String,
}

impl Default for CampaignsConfig {
    fn default() -> Self {
        Self {
            root: default_campaigns_root(),
            default: default_campaign(),
        }
    }
}

fn default_campaigns_root() -> String {
    "campaigns".to_string()
}

fn default_campaign() -> String {
    "beta_invitation".to_string()
}

/// When the contact store is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Flush after every successful send.
    #[default]
    EveryRow,
    /// Flush once when the run ends, including on abort.
    EndOfRun,
}

/// What the runner does after a transient send failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransientPolicy {
    /// Record the row as failed and move on.
    #[default]
    Continue,
    /// Stop the run.
    Abort,
}

/// Send loop configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(default)]
    pub save_policy: SavePolicy,

    #[serde(default)]
    pub on_transient: TransientPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
