// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-facing run summary.

use mailshot_campaign::{RowState, RunSummary};
use mailshot_config::Campaign;

/// Print the summary of a finished run.
pub fn print_summary(campaign: &Campaign, summary: &RunSummary, use_color: bool) {
    println!();
    if summary.dry_run {
        println!("  mailshot {} (dry run)", campaign.id);
    } else {
        println!("  mailshot {}", campaign.id);
    }
    println!("  {}", "-".repeat(40));

    for (label, count) in counts(summary) {
        println!("    {label:<14}{count}");
    }

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        println!();
        println!("  failed contacts:");
        for report in failures {
            let RowState::Failed { reason, retryable } = &report.state else {
                continue;
            };
            let tag = if *retryable { "retry" } else { "check" };
            let line = format!("{} <{}>: {reason}", report.name, report.email);
            if use_color {
                use colored::Colorize;
                let tag = if *retryable { tag.yellow() } else { tag.red() };
                println!("    [{tag}] {line}");
            } else {
                println!("    [{tag}] {line}");
            }
        }
    }
    println!();
}

/// Label and value for each summary row.
fn counts(summary: &RunSummary) -> Vec<(&'static str, usize)> {
    let mut rows = vec![
        ("contacts", summary.total),
        ("already sent", summary.already_sent),
    ];
    if summary.dry_run {
        rows.push(("would send", summary.would_send));
    } else {
        rows.push(("sent", summary.sent));
    }
    rows.push(("skipped", summary.skipped));
    rows.push(("failed", summary.failed));
    rows.push(("pending", summary.pending()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_for_a_real_run() {
        let summary = RunSummary {
            total: 4,
            already_sent: 1,
            sent: 2,
            skipped: 1,
            ..RunSummary::default()
        };
        let rows = counts(&summary);
        assert!(rows.contains(&("sent", 2)));
        assert!(rows.contains(&("pending", 1)));
        assert!(!rows.iter().any(|(label, _)| *label == "would send"));
    }

    #[test]
    fn counts_for_a_dry_run() {
        let summary = RunSummary {
            total: 2,
            would_send: 2,
            dry_run: true,
            ..RunSummary::default()
        };
        let rows = counts(&summary);
        assert!(rows.contains(&("would send", 2)));
        assert!(rows.contains(&("pending", 2)));
    }
}
