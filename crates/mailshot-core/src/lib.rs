// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for mailshot.
//!
//! Holds the contact data model, the error taxonomy, and the two traits the
//! campaign runner is written against: [`ContactStore`] for the persisted
//! contact list and [`MailTransport`] for delivery.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MailshotError;
pub use traits::{ContactStore, MailTransport};
pub use types::{
    ContactRecord, Device, InlineImage, Language, MessageReceipt, OutboundEmail, SkipReason,
    SENT_NO, SENT_YES, parse_sent_flag, sent_flag,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn device_and_language_parse_case_insensitively() {
        assert_eq!(Device::from_str("iOS").unwrap(), Device::Ios);
        assert_eq!(Device::from_str("ANDROID").unwrap(), Device::Android);
        assert_eq!(Language::from_str("Es").unwrap(), Language::Es);
        assert!(Language::from_str("fr").is_err());
    }

    #[test]
    fn enums_display_as_csv_values() {
        for device in Device::iter() {
            assert_eq!(Device::from_str(&device.to_string()).unwrap(), device);
        }
        assert_eq!(Language::En.to_string(), "en");
        assert_eq!(Device::Ios.to_string(), "ios");
    }

    #[test]
    fn language_serializes_lowercase() {
        let json = serde_json::to_string(&Language::Es).unwrap();
        assert_eq!(json, "\"es\"");
    }

    #[test]
    fn sent_flag_parsing() {
        assert_eq!(parse_sent_flag("si"), Some(true));
        assert_eq!(parse_sent_flag(" SI "), Some(true));
        assert_eq!(parse_sent_flag("sí"), Some(true));
        assert_eq!(parse_sent_flag("no"), Some(false));
        assert_eq!(parse_sent_flag(""), Some(false));
        assert_eq!(parse_sent_flag("yes"), None);
        assert_eq!(sent_flag(true), SENT_YES);
        assert_eq!(sent_flag(false), SENT_NO);
    }

    #[test]
    fn classify_flags_unknown_values() {
        let ok = ContactRecord::new("Juan García", "juan@email.com", "ios", "es", false);
        assert_eq!(ok.classify(), Ok((Device::Ios, Language::Es)));

        let android = ContactRecord::new("Ana", "ana@email.com", "android", "en", false);
        assert_eq!(android.classify(), Ok((Device::Android, Language::En)));

        let web = ContactRecord::new("Ana", "ana@email.com", "web", "en", false);
        assert_eq!(
            web.classify(),
            Err(SkipReason::UnknownDevice("web".to_string()))
        );

        let french = ContactRecord::new("Ana", "ana@email.com", "ios", " fr ", false);
        assert_eq!(
            french.classify(),
            Err(SkipReason::UnknownLanguage("fr".to_string()))
        );

        let blank = ContactRecord::new("  ", "ana@email.com", "ios", "en", false);
        assert_eq!(blank.classify(), Err(SkipReason::IncompleteContact));
    }

    #[test]
    fn first_name_and_address() {
        let c = ContactRecord::new("Juan García", " Juan@Email.com ", "ios", "es", false);
        assert_eq!(c.first_name(), "Juan");
        assert_eq!(c.address(), "juan@email.com");
        assert_eq!(ContactRecord::default().first_name(), "");
    }

    #[test]
    fn error_classes() {
        assert!(MailshotError::Config("x".into()).is_fatal());
        assert!(
            MailshotError::Auth {
                message: "535".into()
            }
            .is_fatal()
        );
        assert!(MailshotError::storage(std::io::Error::other("disk")).is_fatal());
        let transient = MailshotError::TransientSend {
            message: "421".into(),
            source: None,
        };
        assert!(!transient.is_fatal());
        assert!(transient.is_retryable());
        let timeout = MailshotError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(timeout.is_retryable());
        let rejected = MailshotError::RecipientRejected {
            recipient: "a@b.c".into(),
            message: "550".into(),
        };
        assert!(!rejected.is_fatal());
        assert!(!rejected.is_retryable());
        assert!(!MailshotError::Render("x".into()).is_fatal());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _store(_: &dyn ContactStore) {}
        fn _transport(_: &dyn MailTransport) {}
    }

    proptest::proptest! {
        #[test]
        fn first_name_is_a_prefix_word(name in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}") {
            let c = ContactRecord::new(name.clone(), "a@b.c", "ios", "es", false);
            proptest::prop_assert!(name.starts_with(c.first_name()));
            proptest::prop_assert!(!c.first_name().contains(' '));
        }
    }
}
