//! CSV export of complaint records
//!
//! Built on the client side from a list response; the server has no export
//! endpoint.

use chrono_tz::Tz;
use thiserror::Error;

use crate::models::Complaint;
use crate::util::format_local;

/// Column order of the exported sheet
pub const CSV_HEADER: [&str; 10] = [
    "No Antrian",
    "Nama",
    "Perusahaan",
    "Telepon",
    "Keluhan",
    "Kategori",
    "Device",
    "No Internet",
    "Status",
    "Waktu",
];

/// Extra column when staff notes are exported
pub const NOTES_HEADER: &str = "Catatan";

/// Placeholder for an empty category, device or customer number
const MISSING: &str = "-";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV: {0}")]
    Flush(String),
    #[error("invalid UTF-8 in CSV: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render complaints as CSV in the given order
pub fn complaints_to_csv(
    complaints: &[Complaint],
    tz: Tz,
    include_notes: bool,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    if include_notes {
        header.push(NOTES_HEADER);
    }
    writer.write_record(&header)?;

    for c in complaints {
        let mut record = vec![
            c.queue_number.clone().unwrap_or_default(),
            c.name.clone(),
            c.company.clone().unwrap_or_default(),
            c.phone.clone(),
            c.complaint.clone(),
            or_missing(&c.category),
            or_missing(&c.device_type),
            or_missing(&c.no_internet),
            c.status.to_string(),
            format_local(c.created_at, tz),
        ];
        if include_notes {
            record.push(c.notes.clone().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ExportError::Flush(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Suggested download name, e.g. `antrian-2024-03-10.csv`
pub fn export_file_name(now: i64, tz: Tz) -> String {
    format!("antrian-{}.csv", crate::util::local_date(now, tz))
}

fn or_missing(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}
