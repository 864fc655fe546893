// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mailshot --campaign <id>` command implementation.

use std::io::IsTerminal;
use std::path::Path;

use tracing::info;

use mailshot_campaign::{PreparedCampaign, RunOptions, RunSummary};
use mailshot_config::{MailshotConfig, SmtpCredentials, load_campaign};
use mailshot_contacts::CsvContactStore;
use mailshot_core::{MailTransport, MailshotError};
use mailshot_smtp::SmtpDispatcher;

use crate::report;

/// Send campaign `campaign_id` through the configured SMTP relay.
///
/// Everything that can fail without side effects (campaign folder,
/// templates, credentials) is checked before the first contact is touched.
pub async fn run_send(
    config: &MailshotConfig,
    campaign_id: &str,
    dry_run: bool,
    plain: bool,
) -> Result<RunSummary, MailshotError> {
    let prepared = prepare(Path::new(&config.campaigns.root), campaign_id)?;
    let credentials = SmtpCredentials::from_env()?;
    let dispatcher = SmtpDispatcher::new(
        &config.smtp,
        &credentials,
        prepared.campaign.from.as_deref(),
    )?;

    let options = RunOptions::from_config(&config.runner, dry_run);
    let summary = execute(&prepared, &dispatcher, options).await?;

    let use_color = !plain && std::io::stdout().is_terminal();
    report::print_summary(&prepared.campaign, &summary, use_color);
    Ok(summary)
}

fn prepare(root: &Path, campaign_id: &str) -> Result<PreparedCampaign, MailshotError> {
    let campaign = load_campaign(root, campaign_id)?;
    info!(
        campaign = %campaign.id,
        name = %campaign.name,
        contacts = %campaign.csv_path.display(),
        "campaign loaded"
    );
    PreparedCampaign::load(campaign)
}

/// Runs a prepared campaign against its contacts CSV.
async fn execute(
    prepared: &PreparedCampaign,
    transport: &dyn MailTransport,
    options: RunOptions,
) -> Result<RunSummary, MailshotError> {
    let mut store = CsvContactStore::new(&prepared.campaign.csv_path);
    prepared
        .runner(transport)
        .with_options(options)
        .run(&mut store)
        .await
}
