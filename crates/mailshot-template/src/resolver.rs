// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picks the subject and HTML body for a language and device.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use mailshot_config::Campaign;
use mailshot_core::{Device, Language, MailshotError, SkipReason};

/// Subject line and HTML body for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub language: Language,
    pub subject: String,
    pub body: String,
}

/// Outcome of [`TemplateResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Ready(&'a Template),
    Skip(SkipReason),
}

/// Templates for one campaign, loaded once before the send loop.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    templates: BTreeMap<Language, Template>,
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the template for `language`.
    pub fn with_template(
        mut self,
        language: Language,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.templates.insert(
            language,
            Template {
                language,
                subject: subject.into(),
                body: body.into(),
            },
        );
        self
    }

    /// Reads the campaign's template files.
    ///
    /// A template file that does not exist leaves its language without a
    /// template (rows in that language are caught by the runner's pre-flight).
    /// Any other read error, or a campaign with no template at all, is a
    /// `Config` error.
    pub fn from_campaign(campaign: &Campaign) -> Result<Self, MailshotError> {
        let mut resolver = Self::new();
        for (&language, path) in &campaign.templates {
            match std::fs::read_to_string(path) {
                Ok(body) => {
                    debug!(%language, template = %path.display(), "template loaded");
                    resolver =
                        resolver.with_template(language, campaign.subject(language), body);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(%language, template = %path.display(), "template file not found");
                }
                Err(e) => {
                    return Err(MailshotError::Config(format!(
                        "cannot read template {}: {e}",
                        path.display()
                    )));
                }
            }
        }

        if resolver.templates.is_empty() {
            return Err(MailshotError::Config(format!(
                "campaign `{}` has no readable HTML template",
                campaign.id
            )));
        }
        Ok(resolver)
    }

    /// Languages that have a template.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.templates.keys().copied()
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.templates.contains_key(&language)
    }

    /// Selects the template for a contact.
    ///
    /// Android has no content path and is always skipped. For iOS a missing
    /// template is a configuration problem, not a per-row skip.
    pub fn resolve(
        &self,
        language: Language,
        device: Device,
    ) -> Result<Resolution<'_>, MailshotError> {
        match device {
            Device::Android => Ok(Resolution::Skip(SkipReason::UnsupportedDevice(device))),
            Device::Ios => self
                .templates
                .get(&language)
                .map(Resolution::Ready)
                .ok_or_else(|| {
                    MailshotError::Config(format!("no template for language `{language}`"))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn campaign_in(dir: &Path, templates: &[(Language, &str)]) -> Campaign {
        Campaign {
            id: "beta".into(),
            name: "Beta".into(),
            dir: dir.to_path_buf(),
            subjects: BTreeMap::from([(Language::Es, "Hola".to_string())]),
            templates: templates
                .iter()
                .map(|(l, name)| (*l, dir.join(name)))
                .collect(),
            csv_path: dir.join("contacts.csv"),
            images_dir: dir.join("images"),
            from: None,
        }
    }

    #[test]
    fn android_is_always_skipped() {
        let resolver = TemplateResolver::new().with_template(Language::En, "Hi", "<p>hi</p>");
        for language in [Language::Es, Language::En] {
            assert_eq!(
                resolver.resolve(language, Device::Android).unwrap(),
                Resolution::Skip(SkipReason::UnsupportedDevice(Device::Android))
            );
        }
    }

    #[test]
    fn ios_gets_language_template() {
        let resolver = TemplateResolver::new()
            .with_template(Language::Es, "Hola", "<p>hola</p>")
            .with_template(Language::En, "Hi", "<p>hi</p>");
        match resolver.resolve(Language::En, Device::Ios).unwrap() {
            Resolution::Ready(t) => {
                assert_eq!(t.subject, "Hi");
                assert_eq!(t.body, "<p>hi</p>");
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn missing_language_is_config_error() {
        let resolver = TemplateResolver::new().with_template(Language::Es, "Hola", "x");
        assert!(matches!(
            resolver.resolve(Language::En, Device::Ios),
            Err(MailshotError::Config(_))
        ));
    }

    #[test]
    fn from_campaign_reads_files_and_subjects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("es.html"), "<p>{{nombre}}</p>").unwrap();
        let campaign = campaign_in(
            dir.path(),
            &[(Language::Es, "es.html"), (Language::En, "en.html")],
        );

        let resolver = TemplateResolver::from_campaign(&campaign).unwrap();
        assert!(resolver.has_language(Language::Es));
        assert!(!resolver.has_language(Language::En));
        match resolver.resolve(Language::Es, Device::Ios).unwrap() {
            Resolution::Ready(t) => assert_eq!(t.subject, "Hola"),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn campaign_without_templates_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let campaign = campaign_in(dir.path(), &[(Language::Es, "missing.html")]);
        assert!(matches!(
            TemplateResolver::from_campaign(&campaign),
            Err(MailshotError::Config(_))
        ));
    }
}
