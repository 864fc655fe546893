// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign folders on disk for end-to-end tests.
//!
//! `CampaignFixture` writes a complete campaign (config, templates, images,
//! contacts CSV) under a temp campaigns root and drives the real CSV store
//! and runner against it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mailshot_campaign::{PreparedCampaign, RunOptions, RunSummary};
use mailshot_config::campaign::CAMPAIGN_FILE;
use mailshot_config::{Campaign, load_campaign};
use mailshot_contacts::CsvContactStore;
use mailshot_core::{Language, MailTransport, MailshotError};

/// Header of every fixture contacts file.
pub const CSV_HEADER: &str = "nombre,email,device,language,enviado";

/// Builder for campaign fixtures.
pub struct CampaignFixtureBuilder {
    id: String,
    name: Option<String>,
    subjects: BTreeMap<Language, String>,
    templates: BTreeMap<Language, String>,
    images: Vec<(String, Vec<u8>)>,
    contacts: Vec<String>,
    from: Option<String>,
}

impl CampaignFixtureBuilder {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            subjects: BTreeMap::new(),
            templates: BTreeMap::new(),
            images: Vec::new(),
            contacts: Vec::new(),
            from: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Subject and HTML body for `language`.
    pub fn with_template(mut self, language: Language, subject: &str, body: &str) -> Self {
        self.subjects.insert(language, subject.to_string());
        self.templates.insert(language, body.to_string());
        self
    }

    /// Adds a file under `images/`.
    pub fn with_image(mut self, file_name: &str, data: &[u8]) -> Self {
        self.images.push((file_name.to_string(), data.to_vec()));
        self
    }

    /// Adds one CSV line after the header, e.g. `Ana,ana@email.com,android,en,no`.
    pub fn with_contact(mut self, line: &str) -> Self {
        self.contacts.push(line.to_string());
        self
    }

    pub fn with_from(mut self, from: &str) -> Self {
        self.from = Some(from.to_string());
        self
    }

    pub fn build(self) -> Result<CampaignFixture, MailshotError> {
        let temp_dir = tempfile::TempDir::new().map_err(MailshotError::storage)?;
        let root = temp_dir.path().join("campaigns");
        let dir = root.join(&self.id);
        std::fs::create_dir_all(dir.join("images")).map_err(MailshotError::storage)?;

        let mut config = String::new();
        if let Some(name) = &self.name {
            config.push_str(&format!("name = {}\n", quoted(name)));
        }
        if let Some(from) = &self.from {
            config.push_str(&format!("from = {}\n", quoted(from)));
        }
        config.push_str("\n[subjects]\n");
        for (language, subject) in &self.subjects {
            config.push_str(&format!("{language} = {}\n", quoted(subject)));
        }
        config.push_str("\n[templates]\n");
        for (language, body) in &self.templates {
            let file = format!("template_{language}.html");
            config.push_str(&format!("{language} = {}\n", quoted(&file)));
            write(&dir.join(&file), body.as_bytes())?;
        }
        write(&dir.join(CAMPAIGN_FILE), config.as_bytes())?;

        for (file_name, data) in &self.images {
            write(&dir.join("images").join(file_name), data)?;
        }

        let csv_path = dir.join("contacts.csv");
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for line in &self.contacts {
            csv.push_str(line);
            csv.push('\n');
        }
        write(&csv_path, csv.as_bytes())?;

        Ok(CampaignFixture {
            id: self.id,
            root,
            csv_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A campaign folder in a temp directory, removed on drop.
pub struct CampaignFixture {
    id: String,
    root: PathBuf,
    csv_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl CampaignFixture {
    pub fn builder(id: &str) -> CampaignFixtureBuilder {
        CampaignFixtureBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The campaigns root containing this fixture's folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Current contents of the contacts CSV.
    pub fn read_csv(&self) -> String {
        std::fs::read_to_string(&self.csv_path).unwrap_or_default()
    }

    /// Data lines of the contacts CSV, without the header.
    pub fn csv_rows(&self) -> Vec<String> {
        self.read_csv().lines().skip(1).map(str::to_string).collect()
    }

    pub fn campaign(&self) -> Result<Campaign, MailshotError> {
        load_campaign(&self.root, &self.id)
    }

    pub fn prepare(&self) -> Result<PreparedCampaign, MailshotError> {
        PreparedCampaign::load(self.campaign()?)
    }

    pub fn store(&self) -> CsvContactStore {
        CsvContactStore::new(&self.csv_path)
    }

    /// Runs the campaign against the on-disk CSV with `transport`.
    pub async fn run(
        &self,
        transport: &dyn MailTransport,
        options: RunOptions,
    ) -> Result<RunSummary, MailshotError> {
        let prepared = self.prepare()?;
        let mut store = self.store();
        prepared
            .runner(transport)
            .with_options(options)
            .run(&mut store)
            .await
    }
}

fn write(path: &Path, data: &[u8]) -> Result<(), MailshotError> {
    std::fs::write(path, data).map_err(MailshotError::storage)
}

/// TOML basic string.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
