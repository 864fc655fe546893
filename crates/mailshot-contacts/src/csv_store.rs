// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV implementation of [`ContactStore`].

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use mailshot_core::{ContactRecord, ContactStore, MailshotError, parse_sent_flag, sent_flag};

/// Columns every contacts file must have, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["nombre", "email", "device", "language", "enviado"];

const NAME: &str = "nombre";
const EMAIL: &str = "email";
const DEVICE: &str = "device";
const LANGUAGE: &str = "language";
const SENT: &str = "enviado";

/// Contacts CSV on disk.
///
/// Remembers the header from the last [`load`](ContactStore::load) so that
/// [`save`](ContactStore::save) writes columns back in the operator's order,
/// including any columns mailshot does not use.
#[derive(Debug)]
pub struct CsvContactStore {
    path: PathBuf,
    columns: Vec<String>,
}

impl CsvContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column order used by the next save.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn format_error(&self, message: impl Into<String>) -> MailshotError {
        MailshotError::Format {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }

    fn write_to(&self, file: &mut NamedTempFile, records: &[ContactRecord]) -> Result<(), MailshotError> {
        let mut writer = csv::Writer::from_writer(file.as_file_mut());
        writer
            .write_record(&self.columns)
            .map_err(MailshotError::storage)?;
        for record in records {
            let row = self
                .columns
                .iter()
                .map(|column| cell(record, column))
                .collect::<Vec<_>>();
            writer.write_record(&row).map_err(MailshotError::storage)?;
        }
        writer.flush().map_err(MailshotError::storage)?;
        Ok(())
    }
}

/// Value of `column` for `record`.
fn cell<'a>(record: &'a ContactRecord, column: &str) -> &'a str {
    match column {
        NAME => &record.name,
        EMAIL => &record.email,
        DEVICE => &record.device,
        LANGUAGE => &record.language,
        SENT => sent_flag(record.sent),
        other => record.extra.get(other).map(String::as_str).unwrap_or(""),
    }
}

impl ContactStore for CsvContactStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&mut self) -> Result<Vec<ContactRecord>, MailshotError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                let not_found = matches!(
                    e.kind(),
                    csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound
                );
                if not_found {
                    MailshotError::Config(format!("contacts file {} not found", self.path.display()))
                } else {
                    MailshotError::storage(e)
                }
            })?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| self.format_error(format!("unreadable header: {e}")))?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !columns.iter().any(|c| c == required))
            .collect();
        if !missing.is_empty() {
            return Err(self.format_error(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                self.format_error(format!("line {line}: {e}"))
            })?;
            // Quoted fields may span lines, so take the line from the reader.
            let line = row
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2);
            if row.len() > columns.len() {
                return Err(self.format_error(format!(
                    "line {line}: {} fields but the header has {}",
                    row.len(),
                    columns.len()
                )));
            }
            let mut record = ContactRecord::default();
            for (column, value) in columns.iter().zip(row.iter()) {
                match column.as_str() {
                    NAME => record.name = value.to_string(),
                    EMAIL => record.email = value.to_string(),
                    DEVICE => record.device = value.to_string(),
                    LANGUAGE => record.language = value.to_string(),
                    SENT => {
                        record.sent = parse_sent_flag(value).ok_or_else(|| {
                            self.format_error(format!(
                                "line {line}: enviado must be `si` or `no`, got `{value}`"
                            ))
                        })?;
                    }
                    other => {
                        record.extra.insert(other.to_string(), value.to_string());
                    }
                }
            }
            records.push(record);
        }

        debug!(
            path = %self.path.display(),
            rows = records.len(),
            "contacts loaded"
        );
        self.columns = columns;
        Ok(records)
    }

    fn save(&mut self, records: &[ContactRecord]) -> Result<(), MailshotError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut file = NamedTempFile::new_in(&dir).map_err(MailshotError::storage)?;
        self.write_to(&mut file, records)?;
        file.as_file_mut().flush().map_err(MailshotError::storage)?;
        // The temp file is owner-only; keep the mode the operator gave the CSV.
        match std::fs::metadata(&self.path) {
            Ok(meta) => file
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(MailshotError::storage)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(MailshotError::storage(e)),
        }
        file.as_file().sync_all().map_err(MailshotError::storage)?;
        file.persist(&self.path)
            .map_err(|e| MailshotError::storage(e.error))?;

        debug!(path = %self.path.display(), rows = records.len(), "contacts saved");
        Ok(())
    }
}
