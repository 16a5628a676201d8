//! CSV serialization of occurrence records.
//!
//! Rows carry no header. Fields are separated by `,` and quoted with `|`
//! when necessary; occurrence references are packed into one `[a;b;c]` field.

use std::fs;
use std::io;
use std::path::Path;

use csv::{QuoteStyle, Writer, WriterBuilder};
use tracing::info;

use crate::{OccurrenceRecord, ReportError};

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote(b'|')
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false);
    builder
}

fn write_records<W: io::Write>(writer: &mut Writer<W>, records: &[OccurrenceRecord]) -> Result<(), ReportError> {
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `records` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns a `ReportError` if:
/// * The parent directory or the file cannot be created.
/// * Writing or flushing a record fails.
pub fn write_csv(path: impl AsRef<Path>, records: &[OccurrenceRecord]) -> Result<(), ReportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let file = fs::File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut writer = builder().from_writer(file);
    write_records(&mut writer, records)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Renders `records` as CSV text.
pub fn to_csv_string(records: &[OccurrenceRecord]) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = builder().from_writer(&mut buffer);
        write_records(&mut writer, records)?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
