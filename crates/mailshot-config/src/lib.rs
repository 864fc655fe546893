// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for mailshot.
//!
//! Two layers live here: the application config (`mailshot.toml`: SMTP relay,
//! campaigns root, runner policies, logging), loaded once with Figment and
//! reported through miette diagnostics, and the per-campaign config found in
//! each campaign folder. SMTP credentials are read from the environment by
//! [`SmtpCredentials`].
//!
//! # Usage
//!
//! ```no_run
//! use mailshot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("SMTP relay: {}:{}", config.smtp.host, config.smtp.port);
//! ```

pub mod campaign;
pub mod credentials;
pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use campaign::{Campaign, CampaignSummary, list_campaigns, load_campaign};
pub use credentials::SmtpCredentials;
pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{MailshotConfig, SavePolicy, SmtpSecurity, TransientPolicy};

/// Loads the configuration hierarchy and validates it.
pub fn load_and_validate() -> Result<MailshotConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads one explicit config file (plus env overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<MailshotConfig, Vec<ConfigError>> {
    if !path.is_file() {
        return Err(vec![ConfigError::Other(format!(
            "config file {} does not exist",
            path.display()
        ))]);
    }
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Loads configuration from a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MailshotConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<MailshotConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<MailshotConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Reads every config file in the hierarchy so diagnostics can point into them.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![Path::new(loader::SYSTEM_CONFIG_PATH).to_path_buf()];
    candidates.extend(loader::user_config_path());
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(loader::LOCAL_CONFIG_FILE));
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
