// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The campaign send loop.
//!
//! Rows move `Pending -> {Skipped, Sent, Failed}`. Only `Sent` changes the
//! persisted record, so a rerun resumes at the first row still marked `no`.

use tracing::{debug, error, info, warn};

use mailshot_config::model::RunnerConfig;
use mailshot_config::{SavePolicy, TransientPolicy};
use mailshot_core::{ContactRecord, ContactStore, MailTransport, MailshotError, SkipReason};
use mailshot_template::{ImageCatalog, Resolution, Template, TemplateResolver, render_email};

use crate::summary::{RowReport, RowState, RunSummary};

/// Knobs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Render every pending row but never dispatch or save.
    pub dry_run: bool,
    pub save_policy: SavePolicy,
    pub on_transient: TransientPolicy,
}

impl RunOptions {
    pub fn from_config(config: &RunnerConfig, dry_run: bool) -> Self {
        Self {
            dry_run,
            save_policy: config.save_policy,
            on_transient: config.on_transient,
        }
    }
}

/// What pre-flight decided for a pending row.
enum Step<'t> {
    Deliver(&'t Template),
    Skip(SkipReason),
}

/// Drives one campaign over a contact store.
pub struct CampaignRunner<'a> {
    resolver: &'a TemplateResolver,
    images: &'a ImageCatalog,
    transport: &'a dyn MailTransport,
    options: RunOptions,
}

impl<'a> CampaignRunner<'a> {
    pub fn new(
        resolver: &'a TemplateResolver,
        images: &'a ImageCatalog,
        transport: &'a dyn MailTransport,
    ) -> Self {
        Self {
            resolver,
            images,
            transport,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Runs the campaign to completion.
    ///
    /// Configuration problems surface before anything is sent. A fatal
    /// dispatch error (bad credentials, storage failure) stops the loop and is
    /// returned; every row already marked sent stays persisted.
    pub async fn run(&self, store: &mut dyn ContactStore) -> Result<RunSummary, MailshotError> {
        let mut records = store.load()?;
        let mut summary = RunSummary {
            total: records.len(),
            already_sent: records.iter().filter(|r| r.sent).count(),
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        let plan = self.preflight(&records)?;
        let deliverable = plan
            .iter()
            .filter(|(_, step)| matches!(step, Step::Deliver(_)))
            .count();
        info!(
            store = %store.location(),
            total = summary.total,
            already_sent = summary.already_sent,
            pending = plan.len(),
            deliverable,
            dry_run = self.options.dry_run,
            "starting campaign run"
        );

        if deliverable > 0 && !self.options.dry_run {
            self.transport.verify().await.inspect_err(|e| {
                error!(transport = self.transport.name(), error = %e, "transport verification failed");
            })?;
        }

        let mut dirty = false;
        for (index, step) in plan {
            let template = match step {
                Step::Skip(reason) => {
                    let contact = &records[index];
                    info!(name = %contact.name, email = %contact.email, %reason, "skipping contact");
                    summary.record(report(index, contact, RowState::Skipped(reason)));
                    continue;
                }
                Step::Deliver(template) => template,
            };

            let contact = &records[index];
            let email = match render_email(template, contact, self.images) {
                Ok(email) => email,
                Err(e) => {
                    warn!(name = %contact.name, email = %contact.email, error = %e, "render failed");
                    let state = RowState::Failed {
                        reason: e.to_string(),
                        retryable: false,
                    };
                    summary.record(report(index, contact, state));
                    continue;
                }
            };

            if self.options.dry_run {
                debug!(to = %email.to, subject = %email.subject, "dry run, not sending");
                summary.record(report(index, contact, RowState::WouldSend));
                continue;
            }

            match self.transport.send(&email).await {
                Ok(receipt) => {
                    info!(
                        name = %contact.name,
                        email = %receipt.recipient,
                        response = receipt.response.as_deref().unwrap_or(""),
                        "sent"
                    );
                    summary.record(report(index, contact, RowState::Sent));
                    records[index].sent = true;
                    dirty = true;
                    if self.options.save_policy == SavePolicy::EveryRow {
                        store.save(&records)?;
                        dirty = false;
                    }
                }
                Err(e) if e.is_fatal() => {
                    error!(
                        name = %contact.name,
                        email = %contact.email,
                        error = %e,
                        sent = summary.sent,
                        "fatal error, aborting run"
                    );
                    self.flush(store, &records, dirty);
                    return Err(e);
                }
                Err(e) => {
                    let retryable = e.is_retryable();
                    warn!(
                        name = %contact.name,
                        email = %contact.email,
                        error = %e,
                        retryable,
                        "send failed"
                    );
                    summary.record(report(
                        index,
                        contact,
                        RowState::Failed {
                            reason: e.to_string(),
                            retryable,
                        },
                    ));
                    if retryable && self.options.on_transient == TransientPolicy::Abort {
                        error!(sent = summary.sent, "transient failure, aborting run");
                        self.flush(store, &records, dirty);
                        return Err(e);
                    }
                }
            }
        }

        if dirty {
            store.save(&records)?;
        }

        info!(
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failed,
            would_send = summary.would_send,
            "campaign run finished"
        );
        Ok(summary)
    }

    /// Decides every pending row before anything is sent.
    ///
    /// A pending row whose language has no template is a configuration
    /// error for the whole campaign.
    fn preflight(&self, records: &[ContactRecord]) -> Result<Vec<(usize, Step<'a>)>, MailshotError> {
        let resolver: &'a TemplateResolver = self.resolver;
        let mut plan = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if record.sent {
                continue;
            }
            let step = match record.classify() {
                Err(reason) => Step::Skip(reason),
                Ok((device, language)) => match resolver.resolve(language, device)? {
                    Resolution::Ready(template) => Step::Deliver(template),
                    Resolution::Skip(reason) => Step::Skip(reason),
                },
            };
            plan.push((index, step));
        }
        Ok(plan)
    }

    /// Persists unsaved progress on the way out of an aborted run.
    fn flush(&self, store: &mut dyn ContactStore, records: &[ContactRecord], dirty: bool) {
        if !dirty {
            return;
        }
        if let Err(e) = store.save(records) {
            error!(store = %store.location(), error = %e, "could not persist progress");
        }
    }
}

fn report(index: usize, contact: &ContactRecord, state: RowState) -> RowReport {
    RowReport {
        index,
        name: contact.name.clone(),
        email: contact.email.clone(),
        state,
    }
}
