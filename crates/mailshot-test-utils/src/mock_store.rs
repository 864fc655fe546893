// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory contact stores.

use std::sync::{Arc, Mutex};

use mailshot_core::{ContactRecord, ContactStore, MailshotError};

/// Contact store backed by a shared vector.
///
/// Clones share the same rows, so a test can hand one clone to the runner
/// and inspect the persisted state through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    rows: Arc<Mutex<Vec<ContactRecord>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryContactStore {
    pub fn new(rows: Vec<ContactRecord>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            saves: Arc::default(),
        }
    }

    /// Rows as last persisted.
    pub fn rows(&self) -> Vec<ContactRecord> {
        lock(&self.rows).clone()
    }

    /// Addresses of rows persisted as sent.
    pub fn sent_addresses(&self) -> Vec<String> {
        lock(&self.rows)
            .iter()
            .filter(|r| r.sent)
            .map(ContactRecord::address)
            .collect()
    }

    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl ContactStore for MemoryContactStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&mut self) -> Result<Vec<ContactRecord>, MailshotError> {
        Ok(self.rows())
    }

    fn save(&mut self, records: &[ContactRecord]) -> Result<(), MailshotError> {
        *lock(&self.rows) = records.to_vec();
        *lock(&self.saves) += 1;
        Ok(())
    }
}

/// Store whose saves start failing after a fixed number of successes.
///
/// Simulates the process dying between a successful send and the flush that
/// would record it.
#[derive(Debug, Clone)]
pub struct CrashingContactStore {
    inner: MemoryContactStore,
    saves_before_crash: usize,
}

impl CrashingContactStore {
    pub fn new(inner: MemoryContactStore, saves_before_crash: usize) -> Self {
        Self {
            inner,
            saves_before_crash,
        }
    }

    pub fn inner(&self) -> &MemoryContactStore {
        &self.inner
    }
}

impl ContactStore for CrashingContactStore {
    fn location(&self) -> String {
        "memory (crashing)".to_string()
    }

    fn load(&mut self) -> Result<Vec<ContactRecord>, MailshotError> {
        self.inner.load()
    }

    fn save(&mut self, records: &[ContactRecord]) -> Result<(), MailshotError> {
        if self.inner.save_count() >= self.saves_before_crash {
            return Err(MailshotError::storage(std::io::Error::other(
                "simulated crash during save",
            )));
        }
        self.inner.save(records)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
