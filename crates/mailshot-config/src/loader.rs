// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./mailshot.toml` > `~/.config/mailshot/mailshot.toml` >
//! `/etc/mailshot/mailshot.toml`, with `MAILSHOT_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MailshotConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/mailshot/mailshot.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mailshot.toml";

/// Per-user config file under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mailshot").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mailshot/mailshot.toml`
/// 3. `~/.config/mailshot/mailshot.toml`
/// 4. `./mailshot.toml`
/// 5. `MAILSHOT_*` environment variables
pub fn load_config() -> Result<MailshotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<MailshotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailshotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MailshotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailshotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MailshotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Maps `MAILSHOT_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `timeout_secs` and `save_policy` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("MAILSHOT_").map(|key| {
        // Keys arrive in their original case.
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("smtp_", "smtp.", 1)
            .replacen("campaigns_", "campaigns.", 1)
            .replacen("runner_", "runner.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
