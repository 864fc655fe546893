// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact store trait: an ordered, mutable record set with atomic flush.

use crate::error::MailshotError;
use crate::types::ContactRecord;

/// Backend holding the campaign's contact list and its send status.
///
/// The CSV file is the only implementation shipped today, but the runner only
/// depends on this trait so another datastore can be swapped in.
pub trait ContactStore: Send {
    /// Human-readable location of the store, used in logs.
    fn location(&self) -> String;

    /// Loads every record in authoring order.
    fn load(&mut self) -> Result<Vec<ContactRecord>, MailshotError>;

    /// Replaces the persisted records with `records`, preserving their order.
    ///
    /// Implementations must not leave a truncated store behind if the process
    /// dies mid-write.
    fn save(&mut self, records: &[ContactRecord]) -> Result<(), MailshotError>;
}
