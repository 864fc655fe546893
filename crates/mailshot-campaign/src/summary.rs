// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-row outcomes and the run summary shown to the operator.

use mailshot_core::SkipReason;

/// Terminal state of a row visited during a run.
///
/// Rows already marked sent are never visited and have no state here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    /// Not attempted. `enviado` stays `no`.
    Skipped(SkipReason),
    /// Accepted by the transport and marked `si`.
    Sent,
    /// Rendered in a dry run; nothing was dispatched.
    WouldSend,
    /// Render or dispatch failed without aborting the run. `enviado` stays `no`.
    Failed { reason: String, retryable: bool },
}

/// Outcome for one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    /// Zero-based position in the contact store.
    pub index: usize,
    pub name: String,
    pub email: String,
    pub state: RowState,
}

/// Counts and per-row outcomes of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows in the contact store.
    pub total: usize,
    /// Rows already marked sent before the run started.
    pub already_sent: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Rows rendered but not dispatched because of a dry run.
    pub would_send: usize,
    pub dry_run: bool,
    pub outcomes: Vec<RowReport>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, report: RowReport) {
        match report.state {
            RowState::Skipped(_) => self.skipped += 1,
            RowState::Sent => self.sent += 1,
            RowState::WouldSend => self.would_send += 1,
            RowState::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(report);
    }

    /// Rows still marked `no` after the run.
    pub fn pending(&self) -> usize {
        self.total - self.already_sent - self.sent
    }

    /// Reports for rows that failed.
    pub fn failures(&self) -> impl Iterator<Item = &RowReport> {
        self.outcomes
            .iter()
            .filter(|r| matches!(r.state, RowState::Failed { .. }))
    }
}
