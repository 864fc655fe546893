// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mailshot --list` command implementation.

use std::io::IsTerminal;
use std::path::Path;

use mailshot_config::{CampaignSummary, list_campaigns};
use mailshot_core::MailshotError;

/// Print the campaigns found under `root`.
pub fn run_list(root: &Path, plain: bool) -> Result<(), MailshotError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let campaigns = list_campaigns(root)?;

    println!();
    println!("  campaigns in {}", root.display());
    println!("  {}", "-".repeat(40));

    if campaigns.is_empty() {
        println!("    (none)");
    }
    for campaign in &campaigns {
        println!("{}", format_campaign(campaign, use_color));
    }
    println!();
    Ok(())
}

fn format_campaign(campaign: &CampaignSummary, use_color: bool) -> String {
    let title = if campaign.name == campaign.id {
        String::new()
    } else {
        format!("  {}", campaign.name)
    };
    if use_color {
        use colored::Colorize;
        format!("    {:<24}{}", campaign.id.bold(), title.dimmed())
    } else {
        format!("    {:<24}{title}", campaign.id)
    }
}
