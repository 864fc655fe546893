// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign orchestration for mailshot.
//!
//! [`PreparedCampaign`] loads a campaign's templates and images once;
//! [`CampaignRunner`] walks the contact store, renders and dispatches each
//! pending row, and persists the `enviado` column as it goes.

pub mod runner;
pub mod summary;

use tracing::info;

use mailshot_config::Campaign;
use mailshot_core::{MailTransport, MailshotError};
use mailshot_template::{ImageCatalog, TemplateResolver};

pub use runner::{CampaignRunner, RunOptions};
pub use summary::{RowReport, RowState, RunSummary};

/// A campaign with its templates and images read into memory.
#[derive(Debug, Clone)]
pub struct PreparedCampaign {
    pub campaign: Campaign,
    pub resolver: TemplateResolver,
    pub images: ImageCatalog,
}

impl PreparedCampaign {
    pub fn load(campaign: Campaign) -> Result<Self, MailshotError> {
        let resolver = TemplateResolver::from_campaign(&campaign)?;
        let images = ImageCatalog::load(&campaign.images_dir)?;
        info!(
            campaign = %campaign.id,
            languages = ?resolver.languages().collect::<Vec<_>>(),
            images = images.len(),
            "campaign prepared"
        );
        Ok(Self {
            campaign,
            resolver,
            images,
        })
    }

    /// Runner bound to this campaign's templates and images.
    pub fn runner<'a>(&'a self, transport: &'a dyn MailTransport) -> CampaignRunner<'a> {
        CampaignRunner::new(&self.resolver, &self.images, transport)
    }
}
