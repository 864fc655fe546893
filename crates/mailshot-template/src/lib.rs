// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template selection and rendering.
//!
//! - [`TemplateResolver`] picks the subject and HTML body for a contact's
//!   language and device.
//! - [`render_email`] fills placeholders from the contact record and swaps
//!   campaign image paths for `cid:` references. It does no I/O: templates
//!   and image bytes are loaded up front by the resolver and [`ImageCatalog`].

pub mod images;
pub mod renderer;
pub mod resolver;

pub use images::ImageCatalog;
pub use renderer::{RenderedBody, render_body, render_email};
pub use resolver::{Resolution, Template, TemplateResolver};
