// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign images embedded inline in every message that references them.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use mailshot_core::{InlineImage, MailshotError};

/// Images found in a campaign's images folder, sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: Vec<InlineImage>,
}

/// MIME type for a supported image file name.
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// `Content-ID` for an image file: `logo.png` becomes `logo_png`.
pub fn content_id(file_name: &str) -> String {
    file_name.replace('.', "_")
}

impl ImageCatalog {
    pub fn new(images: Vec<InlineImage>) -> Self {
        Self { images }
    }

    /// Reads every supported image in `dir`. A missing folder gives an empty catalog.
    pub fn load(dir: &Path) -> Result<Self, MailshotError> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no images folder");
            return Ok(Self::default());
        }

        let mut images = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(MailshotError::storage)? {
            let path = entry.map_err(MailshotError::storage)?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(content_type) = image_content_type(file_name) else {
                continue;
            };
            match std::fs::read(&path) {
                Ok(data) => images.push(InlineImage {
                    file_name: file_name.to_string(),
                    content_id: content_id(file_name),
                    content_type: content_type.to_string(),
                    data: Arc::from(data),
                }),
                Err(e) => warn!(image = %path.display(), error = %e, "image unreadable, skipping"),
            }
        }
        images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(Self { images })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InlineImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
