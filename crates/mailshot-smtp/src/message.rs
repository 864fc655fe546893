// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MIME assembly for rendered campaign emails.

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

use mailshot_core::{MailshotError, OutboundEmail};

/// Parses a `From` mailbox such as `Spotter AI <info@spotter-ai.app>`.
pub fn parse_mailbox(raw: &str) -> Result<Mailbox, MailshotError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| MailshotError::Config(format!("invalid sender mailbox `{raw}`: {e}")))
}

/// Builds the `multipart/related` message for one contact.
///
/// The HTML part comes first, followed by one inline part per image with a
/// `Content-ID` matching the `cid:` reference in the body.
pub fn build_message(from: &Mailbox, email: &OutboundEmail) -> Result<Message, MailshotError> {
    let rejected = |message: String| MailshotError::RecipientRejected {
        recipient: email.to.clone(),
        message,
    };

    let address = email
        .to
        .parse()
        .map_err(|e| rejected(format!("invalid address: {e}")))?;
    let name = Some(email.to_name.clone()).filter(|n| !n.is_empty());
    let to = Mailbox::new(name, address);

    let mut body = MultiPart::related().singlepart(SinglePart::html(email.html_body.clone()));
    for image in &email.inline_images {
        let content_type = ContentType::parse(&image.content_type).map_err(|e| {
            MailshotError::Render(format!(
                "bad content type `{}` for {}: {e}",
                image.content_type, image.file_name
            ))
        })?;
        body = body.singlepart(
            Attachment::new_inline(image.content_id.clone()).body(image.data.to_vec(), content_type),
        );
    }

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.clone())
        .multipart(body)
        .map_err(|e| MailshotError::Render(format!("cannot build message: {e}")))
}
