// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the contact store, renderer, dispatcher and runner.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// CSV value for a contact that has been sent to.
pub const SENT_YES: &str = "si";

/// CSV value for a contact still pending.
pub const SENT_NO: &str = "no";

/// Recipient device, which decides whether campaign content applies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Ios,
    Android,
}

/// Template and subject variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

/// Why a pending row was not attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The device is known but no content path exists for it.
    UnsupportedDevice(Device),
    /// The `device` column holds a value outside [`Device`].
    UnknownDevice(String),
    /// The `language` column holds a value outside [`Language`].
    UnknownLanguage(String),
    /// Blank name or email.
    IncompleteContact,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDevice(device) => write!(f, "unsupported device `{device}`"),
            Self::UnknownDevice(raw) => write!(f, "unknown device `{raw}`"),
            Self::UnknownLanguage(raw) => write!(f, "unknown language `{raw}`"),
            Self::IncompleteContact => f.write_str("missing name or email"),
        }
    }
}

/// Parses an `enviado` cell. Empty cells count as not sent.
pub fn parse_sent_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "si" | "sí" => Some(true),
        "no" | "" => Some(false),
        _ => None,
    }
}

/// Formats the `enviado` cell for a send status.
pub fn sent_flag(sent: bool) -> &'static str {
    if sent { SENT_YES } else { SENT_NO }
}

/// One row of the contacts file.
///
/// `device` and `language` keep the raw cell text so that rows the runner
/// never touches are written back exactly as they were read. Columns outside
/// the required five are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub device: String,
    pub language: String,
    pub sent: bool,
    pub extra: BTreeMap<String, String>,
}

impl ContactRecord {
    /// Builds a record from the five required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        device: impl Into<String>,
        language: impl Into<String>,
        sent: bool,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            device: device.into(),
            language: language.into(),
            sent,
            extra: BTreeMap::new(),
        }
    }

    /// Parsed device, or `None` if the cell holds an unknown value.
    pub fn device(&self) -> Option<Device> {
        Device::from_str(self.device.trim()).ok()
    }

    /// Parsed language, or `None` if the cell holds an unknown value.
    pub fn language(&self) -> Option<Language> {
        Language::from_str(self.language.trim()).ok()
    }

    /// Trimmed, lowercased destination address.
    pub fn address(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// First word of the display name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// Flags rows the runner must skip before consulting the template resolver.
    ///
    /// Returns the parsed device and language when the row is well-formed.
    pub fn classify(&self) -> Result<(Device, Language), SkipReason> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(SkipReason::IncompleteContact);
        }
        let device = self
            .device()
            .ok_or_else(|| SkipReason::UnknownDevice(self.device.trim().to_string()))?;
        let language = self
            .language()
            .ok_or_else(|| SkipReason::UnknownLanguage(self.language.trim().to_string()))?;
        Ok((device, language))
    }
}

/// An image embedded in the message body and referenced by `cid:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub file_name: String,
    pub content_id: String,
    pub content_type: String,
    pub data: Arc<[u8]>,
}

/// A fully rendered message ready for a [`crate::MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub inline_images: Vec<InlineImage>,
}

/// Acknowledgement returned by a transport after the message was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    pub recipient: String,
    pub response: Option<String>,
}
