// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign directories.
//!
//! Each campaign is a folder under the campaigns root:
//!
//! ```text
//! campaigns/beta_invitation/
//!     campaign.toml        (or legacy config.json)
//!     template_es.html
//!     template_en.html
//!     contacts.csv
//!     images/logo.png
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use mailshot_core::{Language, MailshotError};

/// Preferred campaign config file name.
pub const CAMPAIGN_FILE: &str = "campaign.toml";

/// Legacy campaign config file name.
pub const LEGACY_CAMPAIGN_FILE: &str = "config.json";

/// On-disk campaign config, as written by the operator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignFile {
    /// Display name. Defaults to the folder name.
    #[serde(default)]
    pub name: Option<String>,

    /// Subject line per language.
    #[serde(default)]
    pub subjects: BTreeMap<Language, String>,

    /// Template file per language, relative to the campaign folder.
    #[serde(default)]
    pub templates: Option<BTreeMap<Language, String>>,

    /// Contacts file, relative to the campaign folder. Defaults to the first `*.csv`.
    #[serde(default)]
    pub csv: Option<String>,

    /// Images folder, relative to the campaign folder.
    #[serde(default)]
    pub images_dir: Option<String>,

    /// `From` mailbox overriding `smtp.from`.
    #[serde(default)]
    pub from: Option<String>,
}

/// A campaign with every path resolved. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub dir: PathBuf,
    pub subjects: BTreeMap<Language, String>,
    pub templates: BTreeMap<Language, PathBuf>,
    pub csv_path: PathBuf,
    pub images_dir: PathBuf,
    pub from: Option<String>,
}

impl Campaign {
    /// Subject for `language`, falling back to the campaign name.
    pub fn subject(&self, language: Language) -> &str {
        self.subjects
            .get(&language)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

/// Entry printed by `--list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

fn default_templates() -> BTreeMap<Language, String> {
    BTreeMap::from([
        (Language::Es, "template_es.html".to_string()),
        (Language::En, "template_en.html".to_string()),
    ])
}

/// Path of the config file inside `dir`, preferring `campaign.toml`.
fn config_file_in(dir: &Path) -> Option<PathBuf> {
    [CAMPAIGN_FILE, LEGACY_CAMPAIGN_FILE]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parses a campaign config file (TOML or JSON by extension).
pub fn read_campaign_file(path: &Path) -> Result<CampaignFile, MailshotError> {
    let figment = if path.extension().is_some_and(|ext| ext == "json") {
        Figment::from(Json::file(path))
    } else {
        Figment::from(Toml::file(path))
    };
    figment
        .extract()
        .map_err(|e| MailshotError::Config(format!("invalid campaign file {}: {e}", path.display())))
}

/// Lists campaigns under `root`, sorted by id.
///
/// A missing root yields an empty list. A campaign whose config cannot be
/// parsed is still listed, under its folder name.
pub fn list_campaigns(root: &Path) -> Result<Vec<CampaignSummary>, MailshotError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(root).map_err(MailshotError::storage)?;
    let mut campaigns = Vec::new();
    for entry in entries {
        let path = entry.map_err(MailshotError::storage)?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(config_path) = config_file_in(&path) else {
            continue;
        };
        let id = folder_name(&path);
        let name = match read_campaign_file(&config_path) {
            Ok(file) => file.name.unwrap_or_else(|| id.clone()),
            Err(e) => {
                warn!(campaign = %id, error = %e, "campaign config unreadable");
                id.clone()
            }
        };
        campaigns.push(CampaignSummary { id, name, path });
    }
    campaigns.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(campaigns)
}

/// Loads and resolves the campaign `id` under `root`.
///
/// Fails with `Config` if the folder or its config is missing, or if no
/// contacts file can be found.
pub fn load_campaign(root: &Path, id: &str) -> Result<Campaign, MailshotError> {
    let dir = root.join(id);
    let config_path = config_file_in(&dir).ok_or_else(|| {
        let available = list_campaigns(root)
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.id)
            .collect::<Vec<_>>();
        let available = if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        };
        MailshotError::Config(format!(
            "campaign `{id}` not found under {} (available: {available})",
            root.display()
        ))
    })?;

    let file = read_campaign_file(&config_path)?;
    resolve_campaign(id, &dir, file)
}

/// Resolves relative paths in `file` against `dir`.
pub fn resolve_campaign(id: &str, dir: &Path, file: CampaignFile) -> Result<Campaign, MailshotError> {
    let csv_path = match &file.csv {
        Some(csv) => dir.join(csv),
        None => find_csv(dir)?.ok_or_else(|| {
            MailshotError::Config(format!("no .csv file in campaign folder {}", dir.display()))
        })?,
    };

    let templates = file
        .templates
        .unwrap_or_else(default_templates)
        .into_iter()
        .map(|(language, name)| (language, dir.join(name)))
        .collect();

    Ok(Campaign {
        id: id.to_string(),
        name: file.name.unwrap_or_else(|| id.to_string()),
        dir: dir.to_path_buf(),
        subjects: file.subjects,
        templates,
        csv_path,
        images_dir: dir.join(file.images_dir.as_deref().unwrap_or("images")),
        from: file.from,
    })
}

/// First `*.csv` file in `dir` by name.
fn find_csv(dir: &Path) -> Result<Option<PathBuf>, MailshotError> {
    let mut csvs = std::fs::read_dir(dir)
        .map_err(MailshotError::storage)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect::<Vec<_>>();
    csvs.sort();
    Ok(csvs.into_iter().next())
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
