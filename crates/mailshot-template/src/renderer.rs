// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder substitution and inline image wiring.
//!
//! Supported placeholders, with optional whitespace inside the braces:
//!
//! | Token | Value |
//! |---|---|
//! | `{{nombre}}`, `{{name}}` | full name |
//! | `{{first_name}}` | first word of the name |
//! | `{{email}}` | address |
//! | `{{language}}`, `{{device}}` | row values, lowercased |
//! | `{{<column>}}` | any extra CSV column |
//!
//! The bare token `$name` is also replaced with the first name, which older
//! templates rely on.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use mailshot_core::{ContactRecord, InlineImage, MailshotError, OutboundEmail};

use crate::images::ImageCatalog;
use crate::resolver::Template;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

const LEGACY_NAME_TOKEN: &str = "$name";

/// HTML body with the inline images it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub html: String,
    pub images: Vec<InlineImage>,
}

/// Renders `template` for `contact` into a message ready to dispatch.
pub fn render_email(
    template: &Template,
    contact: &ContactRecord,
    images: &ImageCatalog,
) -> Result<OutboundEmail, MailshotError> {
    let RenderedBody { html, images } = render_body(&template.body, contact, images)?;
    Ok(OutboundEmail {
        to: contact.address(),
        to_name: contact.name.trim().to_string(),
        subject: template.subject.clone(),
        html_body: html,
        inline_images: images,
    })
}

/// Substitutes contact fields into `body` and rewrites image references.
///
/// Fails with `Render` if a placeholder names no known field, or names a
/// field that is empty for this contact.
pub fn render_body(
    body: &str,
    contact: &ContactRecord,
    images: &ImageCatalog,
) -> Result<RenderedBody, MailshotError> {
    // `$name` is only honored in template text, never inside substituted values.
    let first_name = escape_html(contact.first_name());
    let push_literal = |html: &mut String, text: &str| {
        html.push_str(&text.replace(LEGACY_NAME_TOKEN, &first_name));
    };

    let mut html = String::with_capacity(body.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(body) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut html, &body[last..whole.start()]);
        html.push_str(&escape_html(&field_value(contact, &caps)?));
        last = whole.end();
    }
    push_literal(&mut html, &body[last..]);

    let mut attached = Vec::new();
    for image in images.iter() {
        let mut referenced = false;
        for quote in ['"', '\''] {
            let local = format!("src={quote}images/{}{quote}", image.file_name);
            if html.contains(&local) {
                let cid = format!("src={quote}cid:{}{quote}", image.content_id);
                html = html.replace(&local, &cid);
                referenced = true;
            }
        }
        if referenced {
            attached.push(image.clone());
        }
    }

    Ok(RenderedBody {
        html,
        images: attached,
    })
}

fn field_value(contact: &ContactRecord, caps: &Captures<'_>) -> Result<String, MailshotError> {
    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value = match key {
        "nombre" | "name" => contact.name.trim().to_string(),
        "first_name" => contact.first_name().to_string(),
        "email" => contact.address(),
        "language" => contact.language.trim().to_lowercase(),
        "device" => contact.device.trim().to_lowercase(),
        other => match contact.extra.get(other) {
            Some(value) => value.trim().to_string(),
            None => {
                return Err(MailshotError::Render(format!(
                    "unknown placeholder {{{{{other}}}}}"
                )));
            }
        },
    };
    if value.is_empty() {
        return Err(MailshotError::Render(format!(
            "placeholder {{{{{key}}}}} has no value for {}",
            contact.address()
        )));
    }
    Ok(value)
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
